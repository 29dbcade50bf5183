//! Real-money purchase business logic.
//!
//! Creating, editing or deleting a purchase runs in one database transaction that
//! also reconciles the derived earning and the owner's cached balance. Two purchases
//! of the same user may not share a `(source_name, date)` pair, since that pair keys
//! the derived earning.

use crate::{
    core::{derivation, reconcile::reconcile_balance, user::require_user, validation},
    entities::{Purchase, purchase},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Fields of a purchase as entered by a user
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseInput {
    pub category: purchase::Category,
    /// Exact product name, e.g. "Season 7 Battle Pass"
    pub source_name: String,
    /// Money paid
    pub amount: f64,
    /// V-Bucks received; zero for purchases that grant none
    pub currency_earned: i64,
    pub date: NaiveDate,
    /// Three-letter currency code
    pub currency: String,
    #[serde(default)]
    pub notes: String,
}

impl PurchaseInput {
    /// Checks and normalizes every field.
    fn validated(self) -> Result<Self> {
        validation::ensure_money(self.amount)?;
        validation::ensure_non_negative(self.currency_earned)?;
        validation::ensure_not_future(self.date)?;
        Ok(Self {
            source_name: validation::required_name(
                "Source name",
                &self.source_name,
                validation::MAX_NAME_LEN,
            )?,
            currency: validation::currency_code(&self.currency)?,
            notes: self.notes.trim().to_string(),
            ..self
        })
    }
}

async fn ensure_key_free<C>(
    db: &C,
    user_id: i64,
    input: &PurchaseInput,
    exclude_id: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if derivation::find_purchase_by_key(db, user_id, &input.source_name, input.date, exclude_id)
        .await?
        .is_some()
    {
        return Err(Error::validation(format!(
            "A purchase named '{}' already exists on {}",
            input.source_name, input.date
        )));
    }
    Ok(())
}

/// Rejects a key held by a directly recorded earning, which the derivation would
/// otherwise take over. Only called once no other purchase owns the key.
async fn ensure_no_direct_earning<C>(db: &C, user_id: i64, input: &PurchaseInput) -> Result<()>
where
    C: ConnectionTrait,
{
    if derivation::find_derived_earning(db, user_id, &input.source_name, input.date)
        .await?
        .is_some()
    {
        return Err(Error::validation(format!(
            "An earning named '{}' already exists on {}; rename the purchase or the earning",
            input.source_name, input.date
        )));
    }
    Ok(())
}

async fn require_owned_purchase<C>(db: &C, user_id: i64, purchase_id: i64) -> Result<purchase::Model>
where
    C: ConnectionTrait,
{
    Purchase::find_by_id(purchase_id)
        .filter(purchase::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Purchase", purchase_id))
}

/// Records a real-money purchase, derives its earning and updates the balance.
///
/// # Errors
/// Returns a validation error for a non-positive amount, negative `currency_earned`,
/// future date, blank name, malformed currency, or a duplicate `(source_name, date)`;
/// [`Error::NotFound`] if the user does not exist.
pub async fn create_purchase(
    db: &DatabaseConnection,
    user_id: i64,
    input: PurchaseInput,
) -> Result<purchase::Model> {
    let input = input.validated()?;

    let txn = db.begin().await?;

    require_user(&txn, user_id).await?;
    ensure_key_free(&txn, user_id, &input, None).await?;
    ensure_no_direct_earning(&txn, user_id, &input).await?;

    let created = purchase::ActiveModel {
        user_id: Set(user_id),
        category: Set(input.category),
        source_name: Set(input.source_name),
        amount: Set(input.amount),
        currency_earned: Set(input.currency_earned),
        date: Set(input.date),
        currency: Set(input.currency),
        notes: Set(input.notes),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    derivation::reconcile_earning(&txn, &created).await?;
    let balance = reconcile_balance(&txn, user_id).await?;

    txn.commit().await?;

    info!(user_id, purchase_id = created.id, balance, "Recorded purchase");
    Ok(created)
}

/// Replaces the fields of an existing purchase and re-derives its earning.
///
/// If the name or date changes, the earning under the old key is removed first.
pub async fn update_purchase(
    db: &DatabaseConnection,
    user_id: i64,
    purchase_id: i64,
    input: PurchaseInput,
) -> Result<purchase::Model> {
    let input = input.validated()?;

    let txn = db.begin().await?;

    let existing = require_owned_purchase(&txn, user_id, purchase_id).await?;
    ensure_key_free(&txn, user_id, &input, Some(purchase_id)).await?;

    if existing.source_name != input.source_name || existing.date != input.date {
        ensure_no_direct_earning(&txn, user_id, &input).await?;
        derivation::remove_derived_earning(&txn, user_id, &existing.source_name, existing.date)
            .await?;
    }

    let mut active: purchase::ActiveModel = existing.into();
    active.category = Set(input.category);
    active.source_name = Set(input.source_name);
    active.amount = Set(input.amount);
    active.currency_earned = Set(input.currency_earned);
    active.date = Set(input.date);
    active.currency = Set(input.currency);
    active.notes = Set(input.notes);
    let updated = active.update(&txn).await?;

    derivation::reconcile_earning(&txn, &updated).await?;
    let balance = reconcile_balance(&txn, user_id).await?;

    txn.commit().await?;

    info!(user_id, purchase_id, balance, "Updated purchase");
    Ok(updated)
}

/// Deletes a purchase along with its derived earning.
pub async fn delete_purchase(db: &DatabaseConnection, user_id: i64, purchase_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = require_owned_purchase(&txn, user_id, purchase_id).await?;
    let (name, date) = (existing.source_name.clone(), existing.date);
    existing.delete(&txn).await?;

    derivation::remove_derived_earning(&txn, user_id, &name, date).await?;
    let balance = reconcile_balance(&txn, user_id).await?;

    txn.commit().await?;

    info!(user_id, purchase_id, balance, "Deleted purchase");
    Ok(())
}

/// Retrieves a purchase by id.
pub async fn get_purchase_by_id(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<Option<purchase::Model>> {
    Purchase::find_by_id(purchase_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's purchases, newest first.
pub async fn list_purchases_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<purchase::Model>> {
    Purchase::find()
        .filter(purchase::Column::UserId.eq(user_id))
        .order_by_desc(purchase::Column::Date)
        .order_by_desc(purchase::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
