//! Parsing of path and query parameters
//!
//! Parameters arrive as raw strings so that malformed values produce the
//! API's own error body instead of an extractor rejection.

use chrono::NaiveDate;

use crate::error::{ApiError, ApiResult};

/// Parse a song id from the path; ids start at 1
pub fn parse_song_id(raw: &str) -> ApiResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::BadRequest(format!("invalid song id: {:?}", raw))),
    }
}

/// Parse a required positive integer query parameter (page sizes, page numbers)
pub fn required_positive(name: &str, raw: Option<&str>) -> ApiResult<u32> {
    let raw = raw
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", name)))?;

    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ApiError::BadRequest(format!(
            "{} must be a positive integer, got {:?}",
            name, raw
        ))),
    }
}

/// Optional `DD.MM.YYYY` query filter; empty means absent
pub fn optional_query_date(name: &str, raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match raw.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => songbook_common::date::parse_display(value)
            .map(Some)
            .map_err(|_| {
                ApiError::BadRequest(format!("{} must be DD.MM.YYYY, got {:?}", name, value))
            }),
    }
}
