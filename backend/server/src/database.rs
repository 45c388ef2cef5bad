//! # MongoDB
//!
//! Document database.
//!
//! One client per process, opened at startup and shared by every request through [`crate::state::AppState`].
//!
//! ## Collections
//! - `items`: inventory entries, `insert_date` stamped on creation
//! - `clock_in`: check-in events, `insert_datetime` stamped on creation
//!
//! ## Seam
//! Handlers only see [`DocumentCollection`]. Every method is a single driver call, no retries,
//! no multi-document transactions. [`crate::memory::MemoryCollection`] implements the same
//! contract in-process.
use async_trait::async_trait;
use bson::{Bson, Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Client, Collection, options::ClientOptions};
use tracing::info;

use crate::{config::Config, error::StoreError};

pub const ITEMS_COLLECTION: &str = "items";
pub const CLOCK_IN_COLLECTION: &str = "clock_in";

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(&'static str, Bson),
    Gte(&'static str, Bson),
}

/// Conjunction of field conditions. Empty matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub conditions: Vec<Condition>,
}

impl Query {
    pub fn eq(mut self, field: &'static str, value: impl Into<Bson>) -> Self {
        self.conditions.push(Condition::Eq(field, value.into()));
        self
    }

    pub fn gte(mut self, field: &'static str, value: impl Into<Bson>) -> Self {
        self.conditions.push(Condition::Gte(field, value.into()));
        self
    }

    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();

        for condition in &self.conditions {
            match condition {
                Condition::Eq(field, value) => {
                    filter.insert(*field, value.clone());
                }
                Condition::Gte(field, value) => {
                    filter.insert(*field, doc! { "$gte": value.clone() });
                }
            }
        }

        filter
    }
}

#[async_trait]
pub trait DocumentCollection: Send + Sync {
    async fn insert_one(&self, document: Document) -> Result<ObjectId, StoreError>;

    async fn find_one(&self, id: ObjectId) -> Result<Option<Document>, StoreError>;

    /// Matching documents in natural order.
    async fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Applies `$set` and returns the modified count. Unchanged values do not count.
    async fn update_one(&self, id: ObjectId, changes: Document) -> Result<u64, StoreError>;

    async fn delete_one(&self, id: ObjectId) -> Result<u64, StoreError>;

    /// `{ "_id": <field value>, "count": <n> }` per distinct value of `field`.
    async fn count_by(&self, field: &str) -> Result<Vec<Document>, StoreError>;
}

pub struct MongoCollection {
    inner: Collection<Document>,
}

impl MongoCollection {
    pub fn new(inner: Collection<Document>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn insert_one(&self, document: Document) -> Result<ObjectId, StoreError> {
        let result = self.inner.insert_one(document).await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::UnexpectedId)
    }

    async fn find_one(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        Ok(self.inner.find_one(doc! { "_id": id }).await?)
    }

    async fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let cursor = self.inner.find(query.to_document()).await?;

        Ok(cursor.try_collect().await?)
    }

    async fn update_one(&self, id: ObjectId, changes: Document) -> Result<u64, StoreError> {
        let result = self
            .inner
            .update_one(doc! { "_id": id }, doc! { "$set": changes })
            .await?;

        Ok(result.modified_count)
    }

    async fn delete_one(&self, id: ObjectId) -> Result<u64, StoreError> {
        let result = self.inner.delete_one(doc! { "_id": id }).await?;

        Ok(result.deleted_count)
    }

    async fn count_by(&self, field: &str) -> Result<Vec<Document>, StoreError> {
        let pipeline = [doc! {
            "$group": { "_id": format!("${field}"), "count": { "$sum": 1 } }
        }];
        let cursor = self.inner.aggregate(pipeline).await?;

        Ok(cursor.try_collect().await?)
    }
}

pub struct MongoCollections {
    pub items: MongoCollection,
    pub clock_in: MongoCollection,
}

pub async fn init_mongo(config: &Config) -> Result<MongoCollections, StoreError> {
    let mut options = ClientOptions::parse(&config.mongo_uri).await?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

    let client = Client::with_options(options)?;
    let database = client.database(&config.database_name);

    database.run_command(doc! { "ping": 1 }).await?;
    info!("Connected to database {}", config.database_name);

    Ok(MongoCollections {
        items: MongoCollection::new(database.collection(ITEMS_COLLECTION)),
        clock_in: MongoCollection::new(database.collection(CLOCK_IN_COLLECTION)),
    })
}
