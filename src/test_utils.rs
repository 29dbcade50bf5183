//! Shared test utilities for the V-Bucks ledger.
//!
//! This module provides helpers for setting up in-memory test databases and
//! creating ledger records with sensible defaults.

use crate::{
    core::{
        balance,
        earning::{self, EarningInput},
        purchase::{self, PurchaseInput},
        refund::{self, RefundInput},
        spending::{self, SpendingInput},
        user, validation,
    },
    entities::{self, Earning},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a test user whose Discord id is derived from `name`.
pub async fn create_test_user(db: &DatabaseConnection, name: &str) -> Result<entities::user::Model> {
    user::register_user(db, &format!("discord-{name}"), name, None, None).await
}

/// Sets up a complete test environment with one registered user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "testuser").await?;
    Ok((db, user))
}

/// Builds a purchase input with sensible defaults.
///
/// # Defaults
/// * `amount`: 9.99
/// * `date`: today
/// * `currency`: "BGN"
/// * `notes`: empty
pub fn purchase_input(
    category: entities::purchase::Category,
    source_name: &str,
    currency_earned: i64,
) -> PurchaseInput {
    PurchaseInput {
        category,
        source_name: source_name.to_string(),
        amount: 9.99,
        currency_earned,
        date: validation::today(),
        currency: "BGN".to_string(),
        notes: String::new(),
    }
}

/// Records a V-Bucks purchase through the engine.
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    user_id: i64,
    source_name: &str,
    currency_earned: i64,
) -> Result<entities::purchase::Model> {
    purchase::create_purchase(
        db,
        user_id,
        purchase_input(entities::purchase::Category::Vbucks, source_name, currency_earned),
    )
    .await
}

/// Inserts a purchase row directly, without deriving its earning or touching the balance.
pub async fn insert_raw_purchase(
    db: &DatabaseConnection,
    user_id: i64,
    category: entities::purchase::Category,
    source_name: &str,
    currency_earned: i64,
) -> Result<entities::purchase::Model> {
    entities::purchase::ActiveModel {
        user_id: Set(user_id),
        category: Set(category),
        source_name: Set(source_name.to_string()),
        amount: Set(9.99),
        currency_earned: Set(currency_earned),
        date: Set(validation::today()),
        currency: Set("BGN".to_string()),
        notes: Set(String::new()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Records an unnamed "Other" earning dated today.
pub async fn create_test_earning(
    db: &DatabaseConnection,
    user_id: i64,
    amount: i64,
) -> Result<entities::earning::Model> {
    earning::create_earning(
        db,
        user_id,
        EarningInput {
            earning_type: entities::earning::EarningType::Other,
            amount,
            date: validation::today(),
            name: None,
        },
    )
    .await
}

/// Records a skin spending dated today.
///
/// # Defaults
/// * `item_name`: "Test item"
/// * `category`: Skin
pub async fn create_test_spending(
    db: &DatabaseConnection,
    user_id: i64,
    amount: i64,
) -> Result<entities::spending::Model> {
    spending::create_spending(
        db,
        user_id,
        SpendingInput {
            item_name: "Test item".to_string(),
            category: entities::spending::SpendingCategory::Skin,
            amount,
            date: validation::today(),
        },
    )
    .await
}

/// Refunds a spending with no reason or notes.
pub async fn create_test_refund(
    db: &DatabaseConnection,
    user_id: i64,
    spending_id: i64,
) -> Result<entities::refund::Model> {
    refund::create_refund(
        db,
        user_id,
        RefundInput {
            spending_id,
            reason: None,
            notes: String::new(),
        },
    )
    .await
}

/// All earnings stored for a user, derived ones included.
pub async fn earnings_for(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<entities::earning::Model>> {
    Earning::find()
        .filter(entities::earning::Column::UserId.eq(user_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Reads the cached `users.balance` field.
pub async fn cached_balance(db: &DatabaseConnection, user_id: i64) -> Result<i64> {
    balance::get_cached_balance(db, user_id).await
}

/// Makes every later write of `users.balance` fail, simulating a store fault in the
/// last step of a reconciliation.
pub async fn install_balance_fault(db: &DatabaseConnection) -> Result<()> {
    use sea_orm::ConnectionTrait;

    db.execute_unprepared(
        "CREATE TRIGGER fail_balance_write BEFORE UPDATE OF balance ON users \
         BEGIN SELECT RAISE(ABORT, 'simulated fault'); END;",
    )
    .await?;
    Ok(())
}
