use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use pl_core::error::PersistenceError;

/// Stored precision. Fixed-width text keeps lexical order chronological.
pub const TIMESTAMP_DIGITS: u16 = 6;

pub fn truncate(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(TIMESTAMP_DIGITS)
}

pub fn to_rfc3339(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn from_rfc3339(value: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PersistenceError::Decode {
            message: format!("invalid timestamp: {value}"),
        })
}

pub fn query_error(err: rusqlite::Error) -> PersistenceError {
    PersistenceError::Query {
        message: err.to_string(),
    }
}
