mod support;

use std::collections::HashMap;

use chrono::Utc;
use pantry::{
    clock_in::{ClockIns, clock_in_query},
    database::Query,
    error::{AppError, StoreError},
    items::{Items, aggregate_by_email, item_query},
    memory::MemoryCollection,
    records,
    schemas::{ClockInFilter, ClockInUpdate, ItemFilter, ItemUpdate},
};

use support::{BrokenCollection, clock_in, item};

const UNKNOWN_ID: &str = "65f1c2a4b7e8d9f0a1b2c3d4";

#[tokio::test]
async fn test_create_assigns_id_and_timestamp() {
    let items = MemoryCollection::default();
    let started = Utc::now();

    let created = records::create::<Items>(&items, item("a@x.io", 2))
        .await
        .unwrap();

    assert_eq!(created.id.len(), 24);
    assert!((created.insert_date - started).num_milliseconds().abs() < 1000);
    assert_eq!(created.email, "a@x.io");
    assert_eq!(created.quantity, 2);
}

#[tokio::test]
async fn test_get_returns_created_record() {
    let items = MemoryCollection::default();
    let created = records::create::<Items>(&items, item("a@x.io", 2))
        .await
        .unwrap();

    let fetched = records::get::<Items>(&items, &created.id).await.unwrap();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_or_malformed_id_is_not_found() {
    let items = MemoryCollection::default();

    for id in [UNKNOWN_ID, "filter", "xyz"] {
        let result = records::get::<Items>(&items, id).await;

        assert!(matches!(result, Err(AppError::NotFound("Item"))));
    }
}

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let items = MemoryCollection::default();
    let created = records::create::<Items>(&items, item("a@x.io", 2))
        .await
        .unwrap();

    let update = ItemUpdate {
        quantity: Some(9),
        item_name: Some("beans".to_string()),
        ..Default::default()
    };
    records::update::<Items>(&items, &created.id, update)
        .await
        .unwrap();
    let fetched = records::get::<Items>(&items, &created.id).await.unwrap();

    assert_eq!(fetched.quantity, 9);
    assert_eq!(fetched.item_name, "beans");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.email, created.email);
    assert_eq!(fetched.expiry_date, created.expiry_date);
    assert_eq!(fetched.insert_date, created.insert_date);
}

// Empty payloads, no-op payloads and unknown ids all surface as NotFound.
#[tokio::test]
async fn test_update_without_modification_is_not_found() {
    let items = MemoryCollection::default();
    let created = records::create::<Items>(&items, item("a@x.io", 2))
        .await
        .unwrap();

    let empty = records::update::<Items>(&items, &created.id, ItemUpdate::default()).await;
    let same = records::update::<Items>(
        &items,
        &created.id,
        ItemUpdate {
            quantity: Some(2),
            ..Default::default()
        },
    )
    .await;
    let unknown = records::update::<Items>(
        &items,
        UNKNOWN_ID,
        ItemUpdate {
            quantity: Some(3),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(empty, Err(AppError::NotFound("Item"))));
    assert!(matches!(same, Err(AppError::NotFound("Item"))));
    assert!(matches!(unknown, Err(AppError::NotFound("Item"))));
}

#[tokio::test]
async fn test_delete_succeeds_once() {
    let items = MemoryCollection::default();
    let created = records::create::<Items>(&items, item("a@x.io", 2))
        .await
        .unwrap();

    let first = records::delete::<Items>(&items, &created.id).await.unwrap();
    let second = records::delete::<Items>(&items, &created.id).await;

    assert_eq!(first.message, "Item deleted successfully");
    assert!(matches!(second, Err(AppError::NotFound("Item"))));
    assert!(items.is_empty().await);
}

#[tokio::test]
async fn test_filter_by_quantity_and_email() {
    let items = MemoryCollection::default();
    for (email, quantity) in [("a@x.io", 1), ("a@x.io", 5), ("b@x.io", 8)] {
        records::create::<Items>(&items, item(email, quantity))
            .await
            .unwrap();
    }

    let all = records::list::<Items>(&items, &Query::default())
        .await
        .unwrap();
    let plenty = item_query(ItemFilter {
        quantity: Some(5),
        ..Default::default()
    })
    .unwrap();
    let plenty = records::list::<Items>(&items, &plenty).await.unwrap();
    let owned = item_query(ItemFilter {
        email: Some("a@x.io".to_string()),
        quantity: Some(2),
        ..Default::default()
    })
    .unwrap();
    let owned = records::list::<Items>(&items, &owned).await.unwrap();

    assert_eq!(
        all.iter().map(|i| i.quantity).collect::<Vec<_>>(),
        [1, 5, 8]
    );
    assert_eq!(
        plenty.iter().map(|i| i.quantity).collect::<Vec<_>>(),
        [5, 8]
    );
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].quantity, 5);
}

#[tokio::test]
async fn test_filter_by_insert_date() {
    let items = MemoryCollection::default();
    records::create::<Items>(&items, item("a@x.io", 1))
        .await
        .unwrap();

    let past = item_query(ItemFilter {
        insert_date: Some("2000-01-01T00:00:00".to_string()),
        ..Default::default()
    })
    .unwrap();
    let future = item_query(ItemFilter {
        insert_date: Some("2999-01-01".to_string()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(records::list::<Items>(&items, &past).await.unwrap().len(), 1);
    assert!(
        records::list::<Items>(&items, &future)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_aggregate_counts_per_email() {
    let items = MemoryCollection::default();
    for (email, quantity) in [("a", 1), ("a", 2), ("b", 1)] {
        records::create::<Items>(&items, item(email, quantity))
            .await
            .unwrap();
    }

    let groups: HashMap<Option<String>, i64> = aggregate_by_email(&items)
        .await
        .unwrap()
        .into_iter()
        .map(|group| (group.email, group.count))
        .collect();

    assert_eq!(
        groups,
        HashMap::from([(Some("a".to_string()), 2), (Some("b".to_string()), 1)])
    );
}

#[tokio::test]
async fn test_store_failures_are_internal() {
    let created = records::create::<Items>(&BrokenCollection, item("a@x.io", 1)).await;
    let fetched = records::get::<Items>(&BrokenCollection, UNKNOWN_ID).await;
    let listed = records::list::<Items>(&BrokenCollection, &Query::default()).await;

    assert!(matches!(created, Err(AppError::Store(StoreError::UnexpectedId))));
    assert!(matches!(fetched, Err(AppError::Store(StoreError::Missing(_)))));
    assert!(matches!(listed, Err(AppError::Store(_))));
}

#[tokio::test]
async fn test_clock_in_lifecycle() {
    let records_store = MemoryCollection::default();
    let started = Utc::now();

    let created = records::create::<ClockIns>(&records_store, clock_in("a@x.io", "north"))
        .await
        .unwrap();
    assert!((created.insert_datetime - started).num_milliseconds().abs() < 1000);

    let fetched = records::get::<ClockIns>(&records_store, &created.id)
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let moved = records::update::<ClockIns>(
        &records_store,
        &created.id,
        ClockInUpdate {
            location: Some("south".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.location, "south");
    assert_eq!(moved.email, created.email);
    assert_eq!(moved.insert_datetime, created.insert_datetime);

    let deleted = records::delete::<ClockIns>(&records_store, &created.id)
        .await
        .unwrap();
    assert_eq!(deleted.message, "Clock-in record deleted successfully");

    let missing = records::get::<ClockIns>(&records_store, &created.id).await;
    assert!(matches!(
        missing,
        Err(AppError::NotFound("Clock-in record"))
    ));
}

#[tokio::test]
async fn test_clock_in_filter() {
    let records_store = MemoryCollection::default();
    for (email, location) in [("a@x.io", "north"), ("b@x.io", "north"), ("a@x.io", "south")] {
        records::create::<ClockIns>(&records_store, clock_in(email, location))
            .await
            .unwrap();
    }

    let query = clock_in_query(ClockInFilter {
        email: Some("a@x.io".to_string()),
        location: Some("north".to_string()),
        insert_datetime: Some("2000-01-01T00:00:00Z".to_string()),
    })
    .unwrap();
    let found = records::list::<ClockIns>(&records_store, &query)
        .await
        .unwrap();
    let everything = records::list::<ClockIns>(&records_store, &Query::default())
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].location, "north");
    assert_eq!(everything.len(), 3);
}
