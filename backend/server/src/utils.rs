use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::AppError;

/// Malformed identifiers are indistinguishable from missing ones.
pub fn parse_object_id(id: &str, label: &'static str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::NotFound(label))
}

/// Accepts RFC 3339, naive date-times and plain dates. Naive values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| AppError::InvalidTimestamp(raw.to_string()))
}

/// Query parameters that are absent or empty impose no constraint.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
