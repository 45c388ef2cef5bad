//! # Payloads
//!
//! Three shapes per resource:
//! - **Create**: every attribute required, the server stamps the insertion timestamp
//! - **Update**: every attribute optional, `null` and absent both mean "leave untouched"
//! - **Output**: the full record, identifier as a hex string under `_id`
//!
//! The `*Document` structs are what the store holds.
use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemCreate {
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: String,
    pub insert_date: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct ItemDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub insert_date: DateTime<Utc>,
}

impl From<ItemDocument> for Item {
    fn from(document: ItemDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            name: document.name,
            email: document.email,
            item_name: document.item_name,
            quantity: document.quantity,
            expiry_date: document.expiry_date,
            insert_date: document.insert_date,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ItemFilter {
    pub email: Option<String>,
    pub expiry_date: Option<String>,
    pub insert_date: Option<String>,
    pub quantity: Option<i64>,
}

/// One row of the per-email aggregate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmailCount {
    #[serde(rename = "_id")]
    pub email: Option<String>,
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClockInCreate {
    pub email: String,
    pub location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ClockInUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClockIn {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub email: String,
    pub location: String,
    pub insert_datetime: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct ClockInDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub location: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub insert_datetime: DateTime<Utc>,
}

impl From<ClockInDocument> for ClockIn {
    fn from(document: ClockInDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            email: document.email,
            location: document.location,
            insert_datetime: document.insert_datetime,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ClockInFilter {
    pub email: Option<String>,
    pub location: Option<String>,
    pub insert_datetime: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Deleted {
    pub message: String,
}
