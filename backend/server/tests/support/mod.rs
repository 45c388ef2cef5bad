#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use pantry::{
    build_router,
    config::Config,
    database::{DocumentCollection, Query},
    error::StoreError,
    memory::MemoryCollection,
    schemas::{ClockInCreate, ItemCreate},
    state::AppState,
};

pub fn test_config() -> Config {
    Config {
        port: 0,
        mongo_uri: "mongodb://localhost:27017".to_string(),
        database_name: "pantry_test".to_string(),
    }
}

pub fn item(email: &str, quantity: i64) -> ItemCreate {
    ItemCreate {
        name: "Sam".to_string(),
        email: email.to_string(),
        item_name: "rice".to_string(),
        quantity,
        expiry_date: "2030-01-01".to_string(),
    }
}

pub fn clock_in(email: &str, location: &str) -> ClockInCreate {
    ClockInCreate {
        email: email.to_string(),
        location: location.to_string(),
    }
}

/// Every call fails the way a dropped connection would.
pub struct BrokenCollection;

#[async_trait]
impl DocumentCollection for BrokenCollection {
    async fn insert_one(&self, _document: Document) -> Result<ObjectId, StoreError> {
        Err(StoreError::UnexpectedId)
    }

    async fn find_one(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Missing(id))
    }

    async fn find(&self, _query: &Query) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::UnexpectedId)
    }

    async fn update_one(&self, id: ObjectId, _changes: Document) -> Result<u64, StoreError> {
        Err(StoreError::Missing(id))
    }

    async fn delete_one(&self, id: ObjectId) -> Result<u64, StoreError> {
        Err(StoreError::Missing(id))
    }

    async fn count_by(&self, _field: &str) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::UnexpectedId)
    }
}

pub fn memory_state() -> Arc<AppState> {
    AppState::with_collections(
        test_config(),
        Arc::new(MemoryCollection::default()),
        Arc::new(MemoryCollection::default()),
    )
}

pub fn broken_state() -> Arc<AppState> {
    AppState::with_collections(
        test_config(),
        Arc::new(BrokenCollection),
        Arc::new(BrokenCollection),
    )
}

pub async fn serve(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state);

    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    addr
}
