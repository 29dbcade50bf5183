//! Reconciliation trigger.
//!
//! Every mutating entry point calls [`reconcile_balance`] as the last step inside its
//! own database transaction, after derived earnings and refund flags are written. The
//! cached balance therefore never reflects a half-applied change: if this write fails,
//! the caller's transaction rolls everything back.

use crate::{
    core::balance::{compute_balance, load_ledger},
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{prelude::*, sea_query::Expr};
use tracing::{debug, instrument};

/// Recomputes the user's balance and stores it in `users.balance`.
///
/// Returns the new balance.
#[instrument(skip(db))]
pub async fn reconcile_balance<C>(db: &C, user_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let ledger = load_ledger(db, user_id).await?;
    let balance = compute_balance(&ledger)?;

    let result = User::update_many()
        .col_expr(user::Column::Balance, Expr::value(balance))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found("User", user_id));
    }

    debug!(user_id, balance, "Cached balance updated");
    Ok(balance)
}
