//! Framework-agnostic ledger engine.
//!
//! Every mutating entry point opens one database transaction, validates, writes the
//! record, reconciles dependent records and the cached balance, and commits.

/// Balance calculator and user summaries
pub mod balance;
/// Earnings mirrored from real-money purchases
pub mod derivation;
/// Directly recorded earnings
pub mod earning;
/// Real-money purchases
pub mod purchase;
/// Cached balance recomputation
pub mod reconcile;
/// Refund state machine
pub mod refund;
/// V-Bucks spendings
pub mod spending;
/// Users and account lifecycle
pub mod user;
/// Field validation
pub mod validation;
