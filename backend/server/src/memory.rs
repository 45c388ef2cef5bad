use std::cmp::Ordering;

use async_trait::async_trait;
use bson::{Bson, Document, doc, oid::ObjectId};
use tokio::sync::Mutex;

use crate::{
    database::{Condition, DocumentCollection, Query},
    error::StoreError,
};

/// In-process collection keeping documents in insertion order.
#[derive(Default)]
pub struct MemoryCollection {
    documents: Mutex<Vec<Document>>,
}

impl MemoryCollection {
    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    document.get_object_id("_id").is_ok_and(|found| found == *id)
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Ordering between two values of the same type class, `None` across classes.
fn compare(left: &Bson, right: &Bson) -> Option<Ordering> {
    match (left, right) {
        (Bson::String(a), Bson::String(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => Some(a.cmp(b)),
        (Bson::Int32(a), Bson::Int32(b)) => Some(a.cmp(b)),
        (Bson::Int64(a), Bson::Int64(b)) => Some(a.cmp(b)),
        _ => as_f64(left)?.partial_cmp(&as_f64(right)?),
    }
}

fn matches(document: &Document, query: &Query) -> bool {
    query.conditions.iter().all(|condition| match condition {
        Condition::Eq(field, value) => document
            .get(*field)
            .is_some_and(|found| found == value || compare(found, value) == Some(Ordering::Equal)),
        Condition::Gte(field, value) => document
            .get(*field)
            .and_then(|found| compare(found, value))
            .is_some_and(Ordering::is_ge),
    })
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert_one(&self, mut document: Document) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();

        let mut stored = doc! { "_id": id };
        document.remove("_id");
        for (key, value) in document {
            stored.insert(key, value);
        }

        self.documents.lock().await.push(stored);

        Ok(id)
    }

    async fn find_one(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.lock().await;

        Ok(documents.iter().find(|d| has_id(d, &id)).cloned())
    }

    async fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.lock().await;

        Ok(documents
            .iter()
            .filter(|d| matches(d, query))
            .cloned()
            .collect())
    }

    async fn update_one(&self, id: ObjectId, changes: Document) -> Result<u64, StoreError> {
        let mut documents = self.documents.lock().await;

        let Some(document) = documents.iter_mut().find(|d| has_id(d, &id)) else {
            return Ok(0);
        };

        let mut modified = false;
        for (key, value) in changes {
            if document.get(&key) != Some(&value) {
                document.insert(key, value);
                modified = true;
            }
        }

        Ok(u64::from(modified))
    }

    async fn delete_one(&self, id: ObjectId) -> Result<u64, StoreError> {
        let mut documents = self.documents.lock().await;

        match documents.iter().position(|d| has_id(d, &id)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count_by(&self, field: &str) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.lock().await;

        let mut groups: Vec<(Bson, i32)> = Vec::new();
        for document in documents.iter() {
            let key = document.get(field).cloned().unwrap_or(Bson::Null);

            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, count)) => *count += 1,
                None => groups.push((key, 1)),
            }
        }

        Ok(groups
            .into_iter()
            .map(|(key, count)| doc! { "_id": key, "count": count })
            .collect())
    }
}
