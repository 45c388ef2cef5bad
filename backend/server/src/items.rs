use bson::{DateTime, from_document};
use tracing::info;

use crate::{
    database::{DocumentCollection, Query},
    error::AppError,
    records::Resource,
    schemas::{EmailCount, Item, ItemCreate, ItemDocument, ItemFilter, ItemUpdate},
    utils::{parse_timestamp, present},
};

pub struct Items;

impl Resource for Items {
    const LABEL: &'static str = "Item";
    const NOUN: &'static str = "item";
    const TIMESTAMP_FIELD: &'static str = "insert_date";

    type Create = ItemCreate;
    type Update = ItemUpdate;
    type Stored = ItemDocument;
    type Output = Item;
}

/// `expiry_date` is compared as a string, not as a date.
pub fn item_query(filter: ItemFilter) -> Result<Query, AppError> {
    let mut query = Query::default();

    if let Some(email) = present(filter.email) {
        query = query.eq("email", email);
    }
    if let Some(expiry_date) = present(filter.expiry_date) {
        query = query.gte("expiry_date", expiry_date);
    }
    if let Some(insert_date) = present(filter.insert_date) {
        let since = parse_timestamp(&insert_date)?;
        query = query.gte(Items::TIMESTAMP_FIELD, DateTime::from_chrono(since));
    }
    if let Some(quantity) = filter.quantity.filter(|q| *q != 0) {
        query = query.gte("quantity", quantity);
    }

    Ok(query)
}

/// Item count per owner email. Group order is whatever the store yields.
pub async fn aggregate_by_email(
    items: &dyn DocumentCollection,
) -> Result<Vec<EmailCount>, AppError> {
    let groups = items
        .count_by("email")
        .await?
        .into_iter()
        .map(from_document::<EmailCount>)
        .collect::<Result<Vec<_>, _>>()?;

    info!("Aggregated items by email: {} groups", groups.len());

    Ok(groups)
}
