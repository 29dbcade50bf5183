//! Earning derivation from real-money purchases.
//!
//! A purchase in a currency-granting category mirrors itself as one earning keyed by
//! `(user, name == source_name, date)`. Purchases that grant nothing (skin packs, or
//! a zero `currency_earned`) must have no earning under that key. All functions run
//! on the caller's connection so they join the caller's transaction.

use crate::{
    entities::{
        Earning, Purchase, earning,
        earning::EarningType,
        purchase::{self, Category},
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Maps a purchase category to the earning type it produces, if any.
#[must_use]
pub const fn earning_type_for(category: Category) -> Option<EarningType> {
    match category {
        Category::Vbucks => Some(EarningType::Purchase),
        Category::Crew => Some(EarningType::Crew),
        Category::Quest => Some(EarningType::Quest),
        Category::Other => Some(EarningType::Other),
        Category::Pack => None,
    }
}

/// Finds every earning stored under a derivation key, oldest first.
async fn find_keyed_earnings<C>(
    db: &C,
    user_id: i64,
    name: &str,
    date: NaiveDate,
) -> Result<Vec<earning::Model>>
where
    C: ConnectionTrait,
{
    Earning::find()
        .filter(earning::Column::UserId.eq(user_id))
        .filter(earning::Column::Name.eq(name))
        .filter(earning::Column::Date.eq(date))
        .order_by_asc(earning::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds the earning mirrored from the given key, if there is one.
pub async fn find_derived_earning<C>(
    db: &C,
    user_id: i64,
    name: &str,
    date: NaiveDate,
) -> Result<Option<earning::Model>>
where
    C: ConnectionTrait,
{
    Ok(find_keyed_earnings(db, user_id, name, date)
        .await?
        .into_iter()
        .next())
}

/// Finds the user's purchase that owns a derivation key, if any.
///
/// `exclude_id` skips one purchase, used when a purchase is checked against its siblings.
pub async fn find_purchase_by_key<C>(
    db: &C,
    user_id: i64,
    name: &str,
    date: NaiveDate,
    exclude_id: Option<i64>,
) -> Result<Option<purchase::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Purchase::find()
        .filter(purchase::Column::UserId.eq(user_id))
        .filter(purchase::Column::SourceName.eq(name))
        .filter(purchase::Column::Date.eq(date));
    if let Some(id) = exclude_id {
        query = query.filter(purchase::Column::Id.ne(id));
    }
    query.one(db).await.map_err(Into::into)
}

/// Returns true if the earning is the mirror of one of its owner's purchases.
pub async fn is_derived<C>(db: &C, earning: &earning::Model) -> Result<bool>
where
    C: ConnectionTrait,
{
    let Some(name) = earning.name.as_deref() else {
        return Ok(false);
    };
    Ok(
        find_purchase_by_key(db, earning.user_id, name, earning.date, None)
            .await?
            .is_some(),
    )
}

/// Deletes every earning stored under a derivation key. Returns how many were removed.
pub async fn remove_derived_earning<C>(
    db: &C,
    user_id: i64,
    name: &str,
    date: NaiveDate,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Earning::delete_many()
        .filter(earning::Column::UserId.eq(user_id))
        .filter(earning::Column::Name.eq(name))
        .filter(earning::Column::Date.eq(date))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        debug!(user_id, name, %date, removed = result.rows_affected, "Removed derived earning");
    }
    Ok(result.rows_affected)
}

/// Brings the earning collection in line with one purchase.
///
/// Returns the earning that now mirrors the purchase, or `None` when the purchase
/// grants no V-Bucks and any earning under its key was removed.
pub async fn reconcile_earning<C>(
    db: &C,
    purchase: &purchase::Model,
) -> Result<Option<earning::Model>>
where
    C: ConnectionTrait,
{
    let user_id = purchase.user_id;
    let name = purchase.source_name.as_str();

    let earning_type = match earning_type_for(purchase.category) {
        Some(t) if purchase.currency_earned > 0 => t,
        _ => {
            remove_derived_earning(db, user_id, name, purchase.date).await?;
            return Ok(None);
        }
    };

    let mut existing = find_keyed_earnings(db, user_id, name, purchase.date)
        .await?
        .into_iter();

    let mirrored = if let Some(first) = existing.next() {
        // Exactly one earning may exist per key
        for duplicate in existing {
            duplicate.delete(db).await?;
        }

        let mut active: earning::ActiveModel = first.into();
        active.earning_type = Set(earning_type);
        active.amount = Set(purchase.currency_earned);
        active.update(db).await?
    } else {
        earning::ActiveModel {
            user_id: Set(user_id),
            earning_type: Set(earning_type),
            amount: Set(purchase.currency_earned),
            date: Set(purchase.date),
            name: Set(Some(purchase.source_name.clone())),
            ..Default::default()
        }
        .insert(db)
        .await?
    };

    debug!(
        user_id,
        purchase_id = purchase.id,
        earning_id = mirrored.id,
        amount = mirrored.amount,
        "Derived earning reconciled"
    );
    Ok(Some(mirrored))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(earning_type_for(Category::Vbucks), Some(EarningType::Purchase));
        assert_eq!(earning_type_for(Category::Crew), Some(EarningType::Crew));
        assert_eq!(earning_type_for(Category::Quest), Some(EarningType::Quest));
        assert_eq!(earning_type_for(Category::Other), Some(EarningType::Other));
        assert_eq!(earning_type_for(Category::Pack), None);
    }

    #[tokio::test]
    async fn test_reconcile_creates_then_updates_in_place() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let mut purchase = insert_raw_purchase(&db, user.id, Category::Crew, "Crew May", 1000).await?;

        let created = reconcile_earning(&db, &purchase).await?.unwrap();
        assert_eq!(created.earning_type, EarningType::Crew);
        assert_eq!(created.amount, 1000);

        purchase.currency_earned = 500;
        let updated = reconcile_earning(&db, &purchase).await?.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 500);

        let all = find_keyed_earnings(&db, user.id, "Crew May", purchase.date).await?;
        assert_eq!(all.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_removes_for_non_granting_purchase() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let mut purchase =
            insert_raw_purchase(&db, user.id, Category::Vbucks, "Starter", 600).await?;
        reconcile_earning(&db, &purchase).await?;

        purchase.category = Category::Pack;
        assert!(reconcile_earning(&db, &purchase).await?.is_none());
        assert!(
            find_derived_earning(&db, user.id, "Starter", purchase.date)
                .await?
                .is_none()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_collapses_duplicates() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let purchase = insert_raw_purchase(&db, user.id, Category::Quest, "Quest 3", 300).await?;

        for _ in 0..2 {
            earning::ActiveModel {
                user_id: Set(user.id),
                earning_type: Set(EarningType::Quest),
                amount: Set(1),
                date: Set(purchase.date),
                name: Set(Some("Quest 3".to_string())),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        reconcile_earning(&db, &purchase).await?;
        let all = find_keyed_earnings(&db, user.id, "Quest 3", purchase.date).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, 300);
        Ok(())
    }
}
