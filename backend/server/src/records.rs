//! Operations shared by every resource. Each one is a single store call, plus a re-fetch after writes.
use bson::{DateTime, Document, from_document, oid::ObjectId, to_document};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, warn};

use crate::{
    database::{DocumentCollection, Query},
    error::{AppError, StoreError},
    schemas::Deleted,
    utils::parse_object_id,
};

pub trait Resource {
    /// Capitalised, used in client-facing messages.
    const LABEL: &'static str;
    /// Lowercase, used in logs.
    const NOUN: &'static str;
    /// Server-assigned insertion timestamp.
    const TIMESTAMP_FIELD: &'static str;

    type Create: Serialize + Send;
    type Update: Serialize + Send;
    type Stored: DeserializeOwned + Into<Self::Output>;
    type Output: Send;
}

async fn fetch<R: Resource>(
    collection: &dyn DocumentCollection,
    id: ObjectId,
) -> Result<Option<R::Output>, StoreError> {
    match collection.find_one(id).await? {
        Some(document) => Ok(Some(decode::<R>(document)?)),
        None => Ok(None),
    }
}

fn decode<R: Resource>(document: Document) -> Result<R::Output, StoreError> {
    Ok(from_document::<R::Stored>(document)?.into())
}

pub async fn create<R: Resource>(
    collection: &dyn DocumentCollection,
    payload: R::Create,
) -> Result<R::Output, AppError> {
    let mut document = to_document(&payload)?;
    document.insert(R::TIMESTAMP_FIELD, DateTime::from_chrono(Utc::now()));

    let id = collection.insert_one(document).await?;
    let record = fetch::<R>(collection, id)
        .await?
        .ok_or(StoreError::Missing(id))?;

    info!("Created {} with ID: {id}", R::NOUN);

    Ok(record)
}

pub async fn get<R: Resource>(
    collection: &dyn DocumentCollection,
    id: &str,
) -> Result<R::Output, AppError> {
    let record = match parse_object_id(id, R::LABEL) {
        Ok(oid) => fetch::<R>(collection, oid).await?,
        Err(_) => None,
    };

    match record {
        Some(record) => {
            info!("Retrieved {} with ID: {id}", R::NOUN);
            Ok(record)
        }
        None => {
            warn!("{} with ID {id} not found", R::LABEL);
            Err(AppError::NotFound(R::LABEL))
        }
    }
}

pub async fn list<R: Resource>(
    collection: &dyn DocumentCollection,
    query: &Query,
) -> Result<Vec<R::Output>, AppError> {
    let records = collection
        .find(query)
        .await?
        .into_iter()
        .map(decode::<R>)
        .collect::<Result<Vec<_>, _>>()?;

    info!("Filtered {} records: {} results", R::NOUN, records.len());

    Ok(records)
}

/// Zero modified documents reads as not found, whether the id is unknown or nothing changed.
pub async fn update<R: Resource>(
    collection: &dyn DocumentCollection,
    id: &str,
    payload: R::Update,
) -> Result<R::Output, AppError> {
    let changes = to_document(&payload)?;

    let modified = match parse_object_id(id, R::LABEL) {
        Ok(oid) if !changes.is_empty() => Some((oid, collection.update_one(oid, changes).await?)),
        _ => None,
    };

    let Some((oid, 1..)) = modified else {
        warn!("{} with ID {id} not found for update", R::LABEL);
        return Err(AppError::NotFound(R::LABEL));
    };

    let record = fetch::<R>(collection, oid)
        .await?
        .ok_or(StoreError::Missing(oid))?;

    info!("Updated {} with ID: {id}", R::NOUN);

    Ok(record)
}

pub async fn delete<R: Resource>(
    collection: &dyn DocumentCollection,
    id: &str,
) -> Result<Deleted, AppError> {
    let deleted = match parse_object_id(id, R::LABEL) {
        Ok(oid) => collection.delete_one(oid).await?,
        Err(_) => 0,
    };

    if deleted == 0 {
        warn!("{} with ID {id} not found for deletion", R::LABEL);
        return Err(AppError::NotFound(R::LABEL));
    }

    info!("Deleted {} with ID: {id}", R::NOUN);

    Ok(Deleted {
        message: format!("{} deleted successfully", R::LABEL),
    })
}
