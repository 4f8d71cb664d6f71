//! Column conversions shared by the repositories.
//!
//! Amounts in microAlgos are stored as BIGINT, decimals and timestamps as
//! TEXT (plain decimal strings and RFC 3339).

use algosave_core::errors::{Error, Result, ValidationError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Converts a microAlgo amount or ledger id for a BIGINT column.
pub fn to_db_u64(value: u64, field_name: &str) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        Error::Validation(ValidationError::invalid(format!(
            "{} {} does not fit in the database",
            field_name, value
        )))
    })
}

pub fn from_db_u64(value: i64, field_name: &str) -> u64 {
    u64::try_from(value).unwrap_or_else(|_| {
        log::error!("Negative {} '{}' in database, reading as 0", field_name, value);
        0
    })
}

pub fn parse_timestamp(value: &str, field_name: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            log::error!("Failed to parse {} '{}': {}", field_name, value, e);
            DateTime::<Utc>::UNIX_EPOCH
        })
}

pub fn parse_decimal(value: &str, field_name: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        log::error!("Failed to parse {} '{}': {}. Falling back to ZERO.", field_name, value, e);
        Decimal::ZERO
    })
}
