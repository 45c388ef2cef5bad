use bson::DateTime;

use crate::{
    database::Query,
    error::AppError,
    records::Resource,
    schemas::{ClockIn, ClockInCreate, ClockInDocument, ClockInFilter, ClockInUpdate},
    utils::{parse_timestamp, present},
};

pub struct ClockIns;

impl Resource for ClockIns {
    const LABEL: &'static str = "Clock-in record";
    const NOUN: &'static str = "clock-in record";
    const TIMESTAMP_FIELD: &'static str = "insert_datetime";

    type Create = ClockInCreate;
    type Update = ClockInUpdate;
    type Stored = ClockInDocument;
    type Output = ClockIn;
}

pub fn clock_in_query(filter: ClockInFilter) -> Result<Query, AppError> {
    let mut query = Query::default();

    if let Some(email) = present(filter.email) {
        query = query.eq("email", email);
    }
    if let Some(location) = present(filter.location) {
        query = query.eq("location", location);
    }
    if let Some(insert_datetime) = present(filter.insert_datetime) {
        let since = parse_timestamp(&insert_datetime)?;
        query = query.gte(ClockIns::TIMESTAMP_FIELD, DateTime::from_chrono(since));
    }

    Ok(query)
}
