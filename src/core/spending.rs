//! Spending business logic - V-Bucks spent on items.
//!
//! The `refunded` flag is not an input here; only `core::refund` changes it. Editing
//! the amount of a refunded spending re-derives its refund's returned amount, and
//! deleting a spending deletes its refund.

use crate::{
    core::{reconcile::reconcile_balance, user::require_user, validation},
    entities::{Refund, Spending, refund, spending},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Fields of a spending as entered by a user
#[derive(Debug, Clone, Deserialize)]
pub struct SpendingInput {
    pub item_name: String,
    pub category: spending::SpendingCategory,
    pub amount: i64,
    pub date: NaiveDate,
}

impl SpendingInput {
    fn validated(self) -> Result<Self> {
        validation::ensure_positive(self.amount)?;
        validation::ensure_not_future(self.date)?;
        Ok(Self {
            item_name: validation::required_name(
                "Item name",
                &self.item_name,
                validation::MAX_ITEM_NAME_LEN,
            )?,
            ..self
        })
    }
}

pub(crate) async fn require_owned_spending<C>(
    db: &C,
    user_id: i64,
    spending_id: i64,
) -> Result<spending::Model>
where
    C: ConnectionTrait,
{
    Spending::find_by_id(spending_id)
        .filter(spending::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Spending", spending_id))
}

/// Records a spending and lowers the balance.
pub async fn create_spending(
    db: &DatabaseConnection,
    user_id: i64,
    input: SpendingInput,
) -> Result<spending::Model> {
    let input = input.validated()?;

    let txn = db.begin().await?;

    require_user(&txn, user_id).await?;

    let created = spending::ActiveModel {
        user_id: Set(user_id),
        item_name: Set(input.item_name),
        category: Set(input.category),
        amount: Set(input.amount),
        date: Set(input.date),
        refunded: Set(false),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let balance = reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, spending_id = created.id, balance, "Recorded spending");
    Ok(created)
}

/// Replaces the fields of a spending, keeping its refund in step.
pub async fn update_spending(
    db: &DatabaseConnection,
    user_id: i64,
    spending_id: i64,
    input: SpendingInput,
) -> Result<spending::Model> {
    let input = input.validated()?;

    let txn = db.begin().await?;

    let existing = require_owned_spending(&txn, user_id, spending_id).await?;

    let mut active: spending::ActiveModel = existing.into();
    active.item_name = Set(input.item_name);
    active.category = Set(input.category);
    active.amount = Set(input.amount);
    active.date = Set(input.date);
    let updated = active.update(&txn).await?;

    Refund::update_many()
        .col_expr(
            refund::Column::VbucksReturned,
            sea_orm::sea_query::Expr::value(updated.amount),
        )
        .filter(refund::Column::SpendingId.eq(spending_id))
        .exec(&txn)
        .await?;

    let balance = reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, spending_id, balance, "Updated spending");
    Ok(updated)
}

/// Deletes a spending and its refund, if any.
pub async fn delete_spending(db: &DatabaseConnection, user_id: i64, spending_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = require_owned_spending(&txn, user_id, spending_id).await?;

    Refund::delete_many()
        .filter(refund::Column::SpendingId.eq(spending_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    let balance = reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, spending_id, balance, "Deleted spending");
    Ok(())
}

/// Retrieves a spending by id.
pub async fn get_spending_by_id(
    db: &DatabaseConnection,
    spending_id: i64,
) -> Result<Option<spending::Model>> {
    Spending::find_by_id(spending_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's spendings, newest first.
pub async fn list_spendings_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<spending::Model>> {
    Spending::find()
        .filter(spending::Column::UserId.eq(user_id))
        .order_by_desc(spending::Column::Date)
        .order_by_desc(spending::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the spendings a user can still refund, newest first.
pub async fn list_refundable_spendings(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<spending::Model>> {
    Spending::find()
        .filter(spending::Column::UserId.eq(user_id))
        .filter(spending::Column::Refunded.eq(false))
        .order_by_desc(spending::Column::Date)
        .order_by_desc(spending::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{refund::get_refund_for_spending, validation::today},
        entities::spending::SpendingCategory,
        test_utils::*,
    };
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn input(item_name: &str, amount: i64) -> SpendingInput {
        SpendingInput {
            item_name: item_name.to_string(),
            category: SpendingCategory::Skin,
            amount,
            date: today(),
        }
    }

    #[tokio::test]
    async fn test_create_spending_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_spending(&db, 1, input("Rainbow Smasher", 0)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = create_spending(&db, 1, input("", 1500)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let mut future = input("Rainbow Smasher", 1500);
        future.date = today() + Duration::days(1);
        let result = create_spending(&db, 1, future).await;
        assert!(matches!(result.unwrap_err(), Error::FutureDate { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_spending_lowers_balance() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_test_earning(&db, user.id, 2000).await?;

        let spending = create_spending(&db, user.id, input("Rainbow Smasher", 1500)).await?;
        assert!(!spending.refunded);
        assert_eq!(spending.category.label(), "Skin");
        assert_eq!(cached_balance(&db, user.id).await?, 500);

        update_spending(&db, user.id, spending.id, input("Rainbow Smasher", 800)).await?;
        assert_eq!(cached_balance(&db, user.id).await?, 1200);

        delete_spending(&db, user.id, spending.id).await?;
        assert_eq!(cached_balance(&db, user.id).await?, 2000);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_refunded_spending_rederives_refund() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_test_earning(&db, user.id, 3000).await?;
        let spending = create_test_spending(&db, user.id, 2000).await?;
        create_test_refund(&db, user.id, spending.id).await?;

        let updated = update_spending(&db, user.id, spending.id, input("Minty Axe", 1200)).await?;
        assert!(updated.refunded);

        let refund = get_refund_for_spending(&db, spending.id).await?.unwrap();
        assert_eq!(refund.vbucks_returned, 1200);
        assert_eq!(cached_balance(&db, user.id).await?, 3000);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_spending_deletes_refund() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_test_earning(&db, user.id, 3000).await?;
        let spending = create_test_spending(&db, user.id, 2000).await?;
        create_test_refund(&db, user.id, spending.id).await?;

        delete_spending(&db, user.id, spending.id).await?;

        assert!(get_spending_by_id(&db, spending.id).await?.is_none());
        assert!(get_refund_for_spending(&db, spending.id).await?.is_none());
        assert_eq!(cached_balance(&db, user.id).await?, 3000);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_refundable_spendings() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let refunded = create_test_spending(&db, user.id, 100).await?;
        let open = create_test_spending(&db, user.id, 200).await?;
        create_test_refund(&db, user.id, refunded.id).await?;

        let refundable = list_refundable_spendings(&db, user.id).await?;
        assert_eq!(refundable.len(), 1);
        assert_eq!(refundable[0].id, open.id);
        assert_eq!(list_spendings_for_user(&db, user.id).await?.len(), 2);
        Ok(())
    }
}
