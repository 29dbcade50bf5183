//! Balance calculation over a user's ledger.
//!
//! The calculator is a pure function of a [`Ledger`] snapshot. Earnings are the single
//! source of truth for V-Bucks granted by purchases (a purchase's `currency_earned`
//! reaches the balance through its derived earning, never directly), and a refund
//! reverses its spending:
//!
//! ```text
//! balance = Σ earning.amount + Σ refund.vbucks_returned − Σ spending.amount
//! ```
//!
//! While every refunded spending has exactly one refund returning its full amount,
//! this equals the earnings minus the spendings that are not refunded.

use crate::{
    core::validation,
    entities::{Earning, Purchase, Refund, Spending, earning, purchase, refund, spending},
    errors::{Error, Result},
};
use sea_orm::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Every ledger record owned by one user, read at a single point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub purchases: Vec<purchase::Model>,
    pub earnings: Vec<earning::Model>,
    pub spendings: Vec<spending::Model>,
    pub refunds: Vec<refund::Model>,
}

/// Aggregated view of a user's ledger for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    /// V-Bucks received from real-money purchases (informational; counted via earnings)
    pub total_purchased: i64,
    /// V-Bucks from all earnings, derived ones included
    pub total_earned: i64,
    /// V-Bucks spent on items that were not refunded
    pub total_spent: i64,
    /// V-Bucks returned by refunds
    pub total_refunded: i64,
    /// Current balance
    pub balance: i64,
    /// Real money paid, per currency code
    pub real_money: BTreeMap<String, f64>,
}

/// Reads all four ledger collections for a user.
pub async fn load_ledger<C>(db: &C, user_id: i64) -> Result<Ledger>
where
    C: ConnectionTrait,
{
    Ok(Ledger {
        purchases: Purchase::find()
            .filter(purchase::Column::UserId.eq(user_id))
            .all(db)
            .await?,
        earnings: Earning::find()
            .filter(earning::Column::UserId.eq(user_id))
            .all(db)
            .await?,
        spendings: Spending::find()
            .filter(spending::Column::UserId.eq(user_id))
            .all(db)
            .await?,
        refunds: Refund::find()
            .filter(refund::Column::UserId.eq(user_id))
            .all(db)
            .await?,
    })
}

fn out_of_range() -> Error {
    Error::validation("V-Bucks total is out of range")
}

/// Sums V-Bucks amounts, failing instead of wrapping on overflow.
fn checked_total(amounts: impl IntoIterator<Item = i64>) -> Result<i64> {
    amounts
        .into_iter()
        .try_fold(0_i64, i64::checked_add)
        .ok_or_else(out_of_range)
}

/// Computes the balance of a ledger snapshot.
///
/// # Errors
/// Returns a validation error if a total does not fit in an `i64`.
pub fn compute_balance(ledger: &Ledger) -> Result<i64> {
    let earned = checked_total(ledger.earnings.iter().map(|e| e.amount))?;
    let returned = checked_total(ledger.refunds.iter().map(|r| r.vbucks_returned))?;
    let spent = checked_total(ledger.spendings.iter().map(|s| s.amount))?;

    earned
        .checked_add(returned)
        .and_then(|credit| credit.checked_sub(spent))
        .ok_or_else(out_of_range)
}

/// Builds the display summary of a ledger snapshot.
pub fn summarize(ledger: &Ledger) -> Result<UserSummary> {
    let mut real_money = BTreeMap::new();
    for p in &ledger.purchases {
        *real_money.entry(p.currency.clone()).or_insert(0.0) += p.amount;
    }
    for total in real_money.values_mut() {
        *total = validation::round_cents(*total);
    }

    Ok(UserSummary {
        total_purchased: checked_total(ledger.purchases.iter().map(|p| p.currency_earned))?,
        total_earned: checked_total(ledger.earnings.iter().map(|e| e.amount))?,
        total_spent: checked_total(
            ledger
                .spendings
                .iter()
                .filter(|s| !s.refunded)
                .map(|s| s.amount),
        )?,
        total_refunded: checked_total(ledger.refunds.iter().map(|r| r.vbucks_returned))?,
        balance: compute_balance(ledger)?,
        real_money,
    })
}

/// Recomputes a user's balance from the ledger without touching the cached value.
pub async fn get_user_balance(db: &DatabaseConnection, user_id: i64) -> Result<i64> {
    crate::core::user::require_user(db, user_id).await?;
    let ledger = load_ledger(db, user_id).await?;
    compute_balance(&ledger)
}

/// Reads the balance cached on the user row, as written by the last reconciliation.
pub async fn get_cached_balance<C>(db: &C, user_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    Ok(crate::core::user::require_user(db, user_id).await?.balance)
}

/// Returns the full summary for a user.
pub async fn get_user_summary(db: &DatabaseConnection, user_id: i64) -> Result<UserSummary> {
    crate::core::user::require_user(db, user_id).await?;
    let ledger = load_ledger(db, user_id).await?;
    summarize(&ledger)
}

/// Checks that the cached `users.balance` matches a fresh calculation.
///
/// # Errors
/// Returns [`Error::Validation`] describing both values when they disagree.
pub async fn verify_cached_balance(db: &DatabaseConnection, user_id: i64) -> Result<i64> {
    let user = crate::core::user::require_user(db, user_id).await?;
    let fresh = compute_balance(&load_ledger(db, user_id).await?)?;
    if user.balance != fresh {
        return Err(Error::validation(format!(
            "Cached balance {} of user {user_id} differs from computed balance {fresh}",
            user.balance
        )));
    }
    Ok(fresh)
}
