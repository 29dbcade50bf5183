//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for currencies and the author's ledger records
pub mod autocomplete;
