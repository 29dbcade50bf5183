//! Earning business logic - V-Bucks credited directly by the user.
//!
//! Earnings mirrored from purchases are owned by the derivation rule: they cannot be
//! edited or deleted here, and a direct earning may not take a purchase's
//! `(name, date)` key.

use crate::{
    core::{derivation, reconcile::reconcile_balance, user::require_user, validation},
    entities::{Earning, earning},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Fields of an earning as entered by a user
#[derive(Debug, Clone, Deserialize)]
pub struct EarningInput {
    pub earning_type: earning::EarningType,
    pub amount: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub name: Option<String>,
}

impl EarningInput {
    fn validated(self) -> Result<Self> {
        validation::ensure_positive(self.amount)?;
        validation::ensure_not_future(self.date)?;
        Ok(Self {
            name: validation::optional_name(
                "Earning name",
                self.name.as_deref(),
                validation::MAX_NAME_LEN,
            )?,
            ..self
        })
    }
}

async fn ensure_not_purchase_key<C>(db: &C, user_id: i64, input: &EarningInput) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(name) = input.name.as_deref() else {
        return Ok(());
    };
    if derivation::find_purchase_by_key(db, user_id, name, input.date, None)
        .await?
        .is_some()
    {
        return Err(Error::validation(format!(
            "'{name}' on {} is recorded by a purchase; edit the purchase instead",
            input.date
        )));
    }
    Ok(())
}

/// Loads an earning the user owns and may edit directly.
async fn require_direct_earning<C>(db: &C, user_id: i64, earning_id: i64) -> Result<earning::Model>
where
    C: ConnectionTrait,
{
    let existing = Earning::find_by_id(earning_id)
        .filter(earning::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Earning", earning_id))?;

    if derivation::is_derived(db, &existing).await? {
        return Err(Error::validation(
            "This earning mirrors a purchase; edit or delete the purchase instead",
        ));
    }
    Ok(existing)
}

/// Records a direct earning and updates the balance.
pub async fn create_earning(
    db: &DatabaseConnection,
    user_id: i64,
    input: EarningInput,
) -> Result<earning::Model> {
    let input = input.validated()?;

    let txn = db.begin().await?;

    require_user(&txn, user_id).await?;
    ensure_not_purchase_key(&txn, user_id, &input).await?;

    let created = earning::ActiveModel {
        user_id: Set(user_id),
        earning_type: Set(input.earning_type),
        amount: Set(input.amount),
        date: Set(input.date),
        name: Set(input.name),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let balance = reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, earning_id = created.id, balance, "Recorded earning");
    Ok(created)
}

/// Replaces the fields of a direct earning.
pub async fn update_earning(
    db: &DatabaseConnection,
    user_id: i64,
    earning_id: i64,
    input: EarningInput,
) -> Result<earning::Model> {
    let input = input.validated()?;

    let txn = db.begin().await?;

    let existing = require_direct_earning(&txn, user_id, earning_id).await?;
    ensure_not_purchase_key(&txn, user_id, &input).await?;

    let mut active: earning::ActiveModel = existing.into();
    active.earning_type = Set(input.earning_type);
    active.amount = Set(input.amount);
    active.date = Set(input.date);
    active.name = Set(input.name);
    let updated = active.update(&txn).await?;

    let balance = reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, earning_id, balance, "Updated earning");
    Ok(updated)
}

/// Deletes a direct earning.
pub async fn delete_earning(db: &DatabaseConnection, user_id: i64, earning_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = require_direct_earning(&txn, user_id, earning_id).await?;
    existing.delete(&txn).await?;

    let balance = reconcile_balance(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, earning_id, balance, "Deleted earning");
    Ok(())
}

/// Retrieves an earning by id.
pub async fn get_earning_by_id(
    db: &DatabaseConnection,
    earning_id: i64,
) -> Result<Option<earning::Model>> {
    Earning::find_by_id(earning_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's earnings, derived ones included, newest first.
pub async fn list_earnings_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<earning::Model>> {
    Earning::find()
        .filter(earning::Column::UserId.eq(user_id))
        .order_by_desc(earning::Column::Date)
        .order_by_desc(earning::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{purchase::create_purchase, validation::today},
        entities::{earning::EarningType, purchase::Category},
        test_utils::*,
    };
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn input(amount: i64, name: Option<&str>) -> EarningInput {
        EarningInput {
            earning_type: EarningType::BattlePass,
            amount,
            date: today(),
            name: name.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_create_earning_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_earning(&db, 1, input(0, None)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = create_earning(&db, 1, input(-100, None)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let mut future = input(100, None);
        future.date = today() + Duration::days(1);
        let result = create_earning(&db, 1, future).await;
        assert!(matches!(result.unwrap_err(), Error::FutureDate { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_earning_lifecycle_updates_balance() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let earning = create_earning(&db, user.id, input(1500, Some("Chapter 5"))).await?;
        assert_eq!(earning.name.as_deref(), Some("Chapter 5"));
        assert_eq!(earning.earning_type.label(), "Battle Pass");
        assert_eq!(cached_balance(&db, user.id).await?, 1500);

        update_earning(&db, user.id, earning.id, input(300, None)).await?;
        let updated = get_earning_by_id(&db, earning.id).await?.unwrap();
        assert_eq!(updated.amount, 300);
        assert_eq!(updated.name, None);
        assert_eq!(cached_balance(&db, user.id).await?, 300);

        delete_earning(&db, user.id, earning.id).await?;
        assert!(get_earning_by_id(&db, earning.id).await?.is_none());
        assert_eq!(cached_balance(&db, user.id).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_derived_earning_is_read_only() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_purchase(&db, user.id, purchase_input(Category::Vbucks, "Pass", 1000)).await?;
        let derived = list_earnings_for_user(&db, user.id).await?.remove(0);

        let result = update_earning(&db, user.id, derived.id, input(5000, Some("Pass"))).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = delete_earning(&db, user.id, derived.id).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        assert_eq!(cached_balance(&db, user.id).await?, 1000);
        Ok(())
    }

    #[tokio::test]
    async fn test_direct_earning_cannot_take_purchase_key() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_purchase(&db, user.id, purchase_input(Category::Pack, "Pack", 0)).await?;

        let result = create_earning(&db, user.id, input(100, Some("Pack"))).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_earning_of_other_user_not_found() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let other = create_test_user(&db, "other").await?;
        let earning = create_earning(&db, user.id, input(100, None)).await?;

        let result = delete_earning(&db, other.id, earning.id).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_oversized_earning_rejected_before_write() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_earning(&db, user.id, input(validation::MAX_VBUCKS_AMOUNT, None)).await?;

        let result = create_earning(&db, user.id, input(i64::MAX, None)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        assert_eq!(earnings_for(&db, user.id).await?.len(), 1);
        assert_eq!(cached_balance(&db, user.id).await?, validation::MAX_VBUCKS_AMOUNT);

        // Many maximal records still sum without overflow
        create_earning(&db, user.id, input(validation::MAX_VBUCKS_AMOUNT, None)).await?;
        assert_eq!(
            cached_balance(&db, user.id).await?,
            2 * validation::MAX_VBUCKS_AMOUNT
        );
        Ok(())
    }
}
