//! Release date conversion
//!
//! Dates cross the API boundary as `DD.MM.YYYY` and are stored as `YYYY-MM-DD`.

use chrono::NaiveDate;

use crate::{Error, Result};

/// Presentation format used in requests and responses
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y";

/// Canonical storage format
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Parse a caller-supplied `DD.MM.YYYY` date
pub fn parse_display(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DISPLAY_FORMAT).map_err(|_| {
        Error::InvalidInput(format!(
            "invalid release date {:?}, expected DD.MM.YYYY",
            value
        ))
    })
}

pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

pub fn to_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Read a date back from its stored representation
pub fn from_canonical(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, CANONICAL_FORMAT).map_err(|source| {
        Error::InvalidStoredDate {
            value: value.to_string(),
            source,
        }
    })
}

/// Serde adapter writing `NaiveDate` as `DD.MM.YYYY`
pub mod display_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_display(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), super::DISPLAY_FORMAT).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display() {
        let date = parse_display("16.07.2006").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2006, 7, 16).unwrap());
    }

    #[test]
    fn test_parse_display_rejects_canonical_form() {
        let err = parse_display("2006-07-16").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_parse_display_rejects_impossible_date() {
        assert!(parse_display("31.02.2006").is_err());
    }

    #[test]
    fn test_canonical_round_trip() {
        let date = NaiveDate::from_ymd_opt(1999, 12, 1).unwrap();
        let stored = to_canonical(date);
        assert_eq!(stored, "1999-12-01");
        assert_eq!(from_canonical(&stored).unwrap(), date);
        assert_eq!(format_display(date), "01.12.1999");
    }

    #[test]
    fn test_from_canonical_surfaces_bad_value() {
        match from_canonical("yesterday") {
            Err(Error::InvalidStoredDate { value, .. }) => assert_eq!(value, "yesterday"),
            other => panic!("expected InvalidStoredDate, got {:?}", other),
        }
    }
}
