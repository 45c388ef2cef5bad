use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

use crate::{
    clock_in::{ClockIns, clock_in_query},
    error::AppError,
    items::{Items, aggregate_by_email, item_query},
    records,
    schemas::{
        ClockIn, ClockInCreate, ClockInFilter, ClockInUpdate, Deleted, EmailCount, Item,
        ItemCreate, ItemFilter, ItemUpdate,
    },
    state::AppState,
};

type AppResult<T> = Result<Json<T>, AppError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|e| AppError::MalformedPayload(e.body_text()))
}

fn params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(inner)| inner)
        .map_err(|e| AppError::MalformedPayload(e.body_text()))
}

pub async fn create_item_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ItemCreate>, JsonRejection>,
) -> AppResult<Item> {
    let item = records::create::<Items>(state.items.as_ref(), body(payload)?).await?;

    Ok(Json(item))
}

pub async fn get_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Item> {
    Ok(Json(records::get::<Items>(state.items.as_ref(), &id).await?))
}

pub async fn filter_items_handler(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ItemFilter>, QueryRejection>,
) -> AppResult<Vec<Item>> {
    let query = item_query(params(filter)?)?;

    Ok(Json(records::list::<Items>(state.items.as_ref(), &query).await?))
}

pub async fn aggregate_items_handler(
    State(state): State<Arc<AppState>>,
) -> AppResult<Vec<EmailCount>> {
    Ok(Json(aggregate_by_email(state.items.as_ref()).await?))
}

pub async fn update_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> AppResult<Item> {
    let item = records::update::<Items>(state.items.as_ref(), &id, body(payload)?).await?;

    Ok(Json(item))
}

pub async fn delete_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Deleted> {
    Ok(Json(records::delete::<Items>(state.items.as_ref(), &id).await?))
}

pub async fn create_clock_in_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClockInCreate>, JsonRejection>,
) -> AppResult<ClockIn> {
    let record = records::create::<ClockIns>(state.clock_in.as_ref(), body(payload)?).await?;

    Ok(Json(record))
}

pub async fn get_clock_in_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ClockIn> {
    Ok(Json(
        records::get::<ClockIns>(state.clock_in.as_ref(), &id).await?,
    ))
}

pub async fn filter_clock_in_handler(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ClockInFilter>, QueryRejection>,
) -> AppResult<Vec<ClockIn>> {
    let query = clock_in_query(params(filter)?)?;

    Ok(Json(
        records::list::<ClockIns>(state.clock_in.as_ref(), &query).await?,
    ))
}

pub async fn update_clock_in_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ClockInUpdate>, JsonRejection>,
) -> AppResult<ClockIn> {
    let record =
        records::update::<ClockIns>(state.clock_in.as_ref(), &id, body(payload)?).await?;

    Ok(Json(record))
}

pub async fn delete_clock_in_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Deleted> {
    Ok(Json(
        records::delete::<ClockIns>(state.clock_in.as_ref(), &id).await?,
    ))
}
