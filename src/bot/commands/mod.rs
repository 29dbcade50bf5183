//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Registration and balance commands
pub mod account;

/// Slash-command choice lists mapped onto ledger enums
pub mod choices;

/// General utility commands
pub mod general;

/// Purchase, earning and spending commands
pub mod ledger;

/// Refund commands
pub mod refund;

// Export commands
pub use account::*;
pub use general::*;
pub use ledger::*;
pub use refund::*;

use crate::{
    core::validation,
    errors::{Error, Result},
};
use chrono::NaiveDate;

/// Parses an optional `YYYY-MM-DD` argument; a missing date means today.
pub(crate) fn parse_date(value: Option<&str>) -> Result<NaiveDate> {
    match value.map(str::trim) {
        None | Some("") => Ok(validation::today()),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| Error::validation(format!("'{text}' is not a date like 2024-06-30"))),
    }
}

/// Reads the record id from an autocomplete entry such as `#12 Renegade Raider`.
pub(crate) fn parse_record_id(value: &str) -> Result<i64> {
    value
        .trim()
        .trim_start_matches('#')
        .split_whitespace()
        .next()
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| Error::validation(format!("'{value}' does not name a record")))
}
