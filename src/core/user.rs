//! User business logic - registration, profile edits, lookups and account deletion.
//!
//! A user's `balance` is never set here apart from initializing it to zero; it is
//! owned by the reconciliation trigger.

use crate::{
    core::validation,
    entities::{Earning, Purchase, Refund, Spending, User, earning, purchase, refund, spending, user},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::info;

/// Profile fields a user may edit
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name, if changing
    pub username: Option<String>,
    /// New Epic Games name; blank clears it
    pub epic_username: Option<String>,
    /// New main platform
    pub platform: Option<user::Platform>,
}

/// Fetches a user or fails with [`Error::NotFound`].
pub async fn require_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))
}

/// Finds a user by internal id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds the user bound to a Discord account.
pub async fn get_user_by_discord_id(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

fn clean_epic_username(value: Option<&str>) -> Result<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => validation::identifier("Epic Games username", v).map(Some),
    }
}

/// Registers a new user with a zero balance.
///
/// # Errors
/// Returns a validation error if the Discord id is blank or already registered, or
/// if the username or Epic Games name is malformed.
pub async fn register_user(
    db: &DatabaseConnection,
    discord_id: &str,
    username: &str,
    epic_username: Option<&str>,
    platform: Option<user::Platform>,
) -> Result<user::Model> {
    let discord_id = validation::required_name("Discord id", discord_id, validation::MAX_NAME_LEN)?;
    let username = validation::required_name("Username", username, validation::MAX_NAME_LEN)?;
    let epic_username = clean_epic_username(epic_username)?;

    if get_user_by_discord_id(db, &discord_id).await?.is_some() {
        return Err(Error::validation(format!(
            "Discord account {discord_id} is already registered"
        )));
    }

    let user = user::ActiveModel {
        discord_id: Set(discord_id),
        username: Set(username),
        epic_username: Set(epic_username),
        platform: Set(platform),
        balance: Set(0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = user.id, username = %user.username, "Registered user");
    Ok(user)
}

/// Applies profile edits. The balance is left untouched.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i64,
    update: ProfileUpdate,
) -> Result<user::Model> {
    let username = update
        .username
        .as_deref()
        .map(|u| validation::required_name("Username", u, validation::MAX_NAME_LEN))
        .transpose()?;
    let epic_username = update
        .epic_username
        .as_deref()
        .map(|e| clean_epic_username(Some(e)))
        .transpose()?;

    let existing = require_user(db, user_id).await?;
    let mut active: user::ActiveModel = existing.into();
    if let Some(username) = username {
        active.username = Set(username);
    }
    if let Some(epic_username) = epic_username {
        active.epic_username = Set(epic_username);
    }
    if let Some(platform) = update.platform {
        active.platform = Set(Some(platform));
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a user together with every ledger record they own.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let user = require_user(&txn, user_id).await?;

    // Refunds reference spendings, so they go first
    Refund::delete_many()
        .filter(refund::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Spending::delete_many()
        .filter(spending::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Earning::delete_many()
        .filter(earning::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Purchase::delete_many()
        .filter(purchase::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    user.delete(&txn).await?;

    txn.commit().await?;
    info!(user_id, "Deleted user and ledger");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::user::Platform;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_register_user() -> Result<()> {
        let db = setup_test_db().await?;
        let user = register_user(&db, "1234", "testuser", Some("test_epic123"), Some(Platform::Pc))
            .await?;

        assert_eq!(user.discord_id, "1234");
        assert_eq!(user.username, "testuser");
        assert_eq!(user.epic_username.as_deref(), Some("test_epic123"));
        assert_eq!(user.platform, Some(Platform::Pc));
        assert_eq!(user.balance, 0);

        let found = get_user_by_discord_id(&db, "1234").await?.unwrap();
        assert_eq!(found, user);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_discord_id() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, "1234", "first", None, None).await?;

        let result = register_user(&db, "1234", "second", None, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_epic_username_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let result = register_user(&db, "1", "player", Some("invalid!name"), None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let user = register_user(&db, "2", "player", Some("   "), None).await?;
        assert_eq!(user.epic_username, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_keeps_balance() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        create_test_earning(&db, user.id, 250).await?;

        let updated = update_profile(
            &db,
            user.id,
            ProfileUpdate {
                username: Some("renamed".to_string()),
                epic_username: Some("new_epic".to_string()),
                platform: Some(Platform::NintendoSwitch),
            },
        )
        .await?;

        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.epic_username.as_deref(), Some("new_epic"));
        assert_eq!(updated.platform, Some(Platform::NintendoSwitch));
        assert_eq!(updated.balance, 250);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_cascades() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let other = register_user(&db, "other", "other", None, None).await?;

        create_test_purchase(&db, user.id, "Pass", 1000).await?;
        let spending = create_test_spending(&db, user.id, 300).await?;
        create_test_refund(&db, user.id, spending.id).await?;
        create_test_earning(&db, other.id, 50).await?;

        delete_user(&db, user.id).await?;

        assert!(get_user_by_id(&db, user.id).await?.is_none());
        assert_eq!(Purchase::find().count(&db).await?, 0);
        assert_eq!(Spending::find().count(&db).await?, 0);
        assert_eq!(Refund::find().count(&db).await?, 0);
        // Only the other user's earning survives
        assert_eq!(Earning::find().count(&db).await?, 1);
        assert!(get_user_by_id(&db, other.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_user() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_user(&db, 42).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }
}
