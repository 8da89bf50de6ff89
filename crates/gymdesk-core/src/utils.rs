//! Date helpers shared by the wire types and the console

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the `YYYY-MM-DD` prefix of an ISO date or timestamp
const DATE_PREFIX_LEN: usize = 10;

/// Parse the date part of an ISO-date-like string
///
/// The API returns dates either as `2024-03-01` or as full timestamps such as
/// `2024-03-01T00:00:00.000Z`; only the first ten characters are significant.
///
/// # Errors
///
/// Returns a validation error if the prefix is not a `YYYY-MM-DD` date.
pub fn parse_date_prefix(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let prefix = trimmed.get(..DATE_PREFIX_LEN).unwrap_or(trimmed);

    NaiveDate::parse_from_str(prefix, DATE_FORMAT)
        .map_err(|e| Error::validation("date", format!("invalid date '{value}': {e}")))
}

/// Parse an optional date typed by a user; blank input means "no date"
///
/// # Errors
///
/// Returns a validation error if the input is not blank and not a date.
pub fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date_prefix(value).map(Some)
}

/// Format a date the way the API expects it
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse an attendance timestamp
///
/// Accepts RFC 3339 as well as naive `YYYY-MM-DD HH:MM:SS` and
/// `YYYY-MM-DDTHH:MM:SS` (optionally with fractional seconds), the latter
/// two interpreted as UTC.
///
/// # Errors
///
/// Returns a validation error if none of the formats match.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::validation("check_time", format!("invalid timestamp '{value}'")))
}

/// Serde adapter for `NaiveDate` fields exchanged as ISO-date-like strings
pub mod date_only {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serialize as `YYYY-MM-DD`
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    /// Deserialize from the first ten characters of a string
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string with a `YYYY-MM-DD` prefix.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_prefix(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for attendance timestamps
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serialize as RFC 3339
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    /// Deserialize from any format accepted by [`super::parse_timestamp`]
    ///
    /// # Errors
    ///
    /// Fails if the value is not a recognizable timestamp string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}
