//! Refund state machine.
//!
//! Each spending is either [`RefundState::Open`] (flag false, no refund row) or
//! [`RefundState::Refunded`] (flag true, exactly one refund row). Creating a refund
//! moves Open to Refunded; deleting it moves back. Both transitions write the flag,
//! the refund row and the cached balance in a single database transaction, and every
//! precondition is checked before the first write.
//!
//! The returned amount is never an input: [`RefundInput`] has no field for it, and it
//! is copied from the spending whenever a refund is written.

use crate::{
    core::{reconcile::reconcile_balance, spending::require_owned_spending, user::require_user},
    entities::{Refund, Spending, refund, spending},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, warn};

/// Refund state of a single spending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundState {
    /// Not refunded
    Open,
    /// Refunded by exactly one refund
    Refunded,
}

impl RefundState {
    /// State recorded on a spending.
    #[must_use]
    pub const fn of(spending: &spending::Model) -> Self {
        if spending.refunded {
            Self::Refunded
        } else {
            Self::Open
        }
    }
}

/// Fields of a refund as requested by a user
#[derive(Debug, Clone, Deserialize)]
pub struct RefundInput {
    /// The spending to refund
    pub spending_id: i64,
    #[serde(default)]
    pub reason: Option<refund::RefundReason>,
    #[serde(default)]
    pub notes: String,
}

async fn set_refunded_flag<C>(db: &C, spending: spending::Model, refunded: bool) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut active: spending::ActiveModel = spending.into();
    active.refunded = Set(refunded);
    active.update(db).await?;
    Ok(())
}

async fn require_owned_refund<C>(db: &C, user_id: i64, refund_id: i64) -> Result<refund::Model>
where
    C: ConnectionTrait,
{
    Refund::find_by_id(refund_id)
        .filter(refund::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Refund", refund_id))
}

/// Refunds a spending: Open → Refunded.
///
/// # Errors
/// - [`Error::NotFound`] if the user or spending does not exist
/// - [`Error::Validation`] if the spending belongs to another user
/// - [`Error::AlreadyRefunded`] if the spending is already refunded
pub async fn create_refund(
    db: &DatabaseConnection,
    user_id: i64,
    input: RefundInput,
) -> Result<refund::Model> {
    let notes = input.notes.trim().to_string();

    let txn = db.begin().await?;

    require_user(&txn, user_id).await?;
    let spending = Spending::find_by_id(input.spending_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Spending", input.spending_id))?;

    if spending.user_id != user_id {
        return Err(Error::validation(
            "The original purchase must be one of your own spendings",
        ));
    }
    let already_linked = Refund::find()
        .filter(refund::Column::SpendingId.eq(spending.id))
        .one(&txn)
        .await?
        .is_some();
    if RefundState::of(&spending) == RefundState::Refunded || already_linked {
        warn!(user_id, spending_id = spending.id, "Rejected second refund");
        return Err(Error::AlreadyRefunded {
            spending_id: spending.id,
        });
    }

    let spending_id = spending.id;
    let vbucks_returned = spending.amount;
    set_refunded_flag(&txn, spending, true).await?;

    let created = refund::ActiveModel {
        user_id: Set(user_id),
        spending_id: Set(spending_id),
        vbucks_returned: Set(vbucks_returned),
        refunded_at: Set(chrono::Utc::now()),
        reason: Set(input.reason),
        notes: Set(notes),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let balance = reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, spending_id, refund_id = created.id, balance, "Refunded spending");
    Ok(created)
}

/// Edits the reason and notes of a refund. The linked spending cannot change; the
/// returned amount is re-derived from it.
pub async fn update_refund_details(
    db: &DatabaseConnection,
    user_id: i64,
    refund_id: i64,
    reason: Option<refund::RefundReason>,
    notes: &str,
) -> Result<refund::Model> {
    let txn = db.begin().await?;

    let existing = require_owned_refund(&txn, user_id, refund_id).await?;
    let spending = require_owned_spending(&txn, user_id, existing.spending_id).await?;

    let mut active: refund::ActiveModel = existing.into();
    active.reason = Set(reason);
    active.notes = Set(notes.trim().to_string());
    active.vbucks_returned = Set(spending.amount);
    let updated = active.update(&txn).await?;

    reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Removes a refund: Refunded → Open. The spending is kept and counts again.
pub async fn delete_refund(db: &DatabaseConnection, user_id: i64, refund_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = require_owned_refund(&txn, user_id, refund_id).await?;
    let spending_id = existing.spending_id;
    existing.delete(&txn).await?;

    let spending = require_owned_spending(&txn, user_id, spending_id).await?;
    set_refunded_flag(&txn, spending, false).await?;

    let balance = reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, spending_id, refund_id, balance, "Removed refund");
    Ok(())
}

/// Retrieves a refund by id.
pub async fn get_refund_by_id(
    db: &DatabaseConnection,
    refund_id: i64,
) -> Result<Option<refund::Model>> {
    Refund::find_by_id(refund_id).one(db).await.map_err(Into::into)
}

/// Retrieves the refund of a spending, if it has one.
pub async fn get_refund_for_spending(
    db: &DatabaseConnection,
    spending_id: i64,
) -> Result<Option<refund::Model>> {
    Refund::find()
        .filter(refund::Column::SpendingId.eq(spending_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's refunds, most recent first.
pub async fn list_refunds_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<refund::Model>> {
    Refund::find()
        .filter(refund::Column::UserId.eq(user_id))
        .order_by_desc(refund::Column::RefundedAt)
        .order_by_desc(refund::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
