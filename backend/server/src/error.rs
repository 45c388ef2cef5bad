use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bson::oid::ObjectId;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("Inserted id is not an ObjectId")]
    UnexpectedId,

    #[error("Document {0} missing after write")]
    Missing(ObjectId),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    MalformedPayload(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<bson::ser::Error> for AppError {
    fn from(e: bson::ser::Error) -> Self {
        AppError::Store(e.into())
    }
}

impl From<bson::de::Error> for AppError {
    fn from(e: bson::de::Error) -> Self {
        AppError::Store(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::NotFound(label) => (StatusCode::NOT_FOUND, format!("{label} not found")),
            AppError::MalformedPayload(reason) => (StatusCode::UNPROCESSABLE_ENTITY, reason),
            AppError::InvalidTimestamp(raw) => {
                error!("Failed to parse timestamp filter: {raw}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Store(e) => {
                error!("Request failed: {e}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
