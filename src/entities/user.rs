//! User entity - The owner of every ledger record.
//!
//! Besides identity, a user carries a cached `balance` that mirrors the balance
//! calculator's output. It is written only by the reconciliation trigger.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gaming platform a player mainly uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Platform {
    #[sea_orm(string_value = "PC")]
    Pc,
    #[sea_orm(string_value = "PS")]
    PlayStation,
    #[sea_orm(string_value = "XB")]
    Xbox,
    #[sea_orm(string_value = "NS")]
    NintendoSwitch,
    #[sea_orm(string_value = "MOBILE")]
    Mobile,
}

impl Platform {
    /// Human-readable platform name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::PlayStation => "PlayStation",
            Self::Xbox => "Xbox",
            Self::NintendoSwitch => "Nintendo Switch",
            Self::Mobile => "Mobile",
        }
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID this account is bound to
    #[sea_orm(unique)]
    pub discord_id: String,
    /// Display name
    pub username: String,
    /// Optional Epic Games account name (letters, digits and underscores)
    pub epic_username: Option<String>,
    /// Optional main platform
    pub platform: Option<Platform>,
    /// Cached V-Bucks balance, recomputed after every ledger mutation
    pub balance: i64,
    /// When the user registered
    pub created_at: DateTimeUtc,
}

/// A user owns every ledger collection
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
    #[sea_orm(has_many = "super::earning::Entity")]
    Earnings,
    #[sea_orm(has_many = "super::spending::Entity")]
    Spendings,
    #[sea_orm(has_many = "super::refund::Entity")]
    Refunds,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::earning::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Earnings.def()
    }
}

impl Related<super::spending::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Spendings.def()
    }
}

impl Related<super::refund::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Refunds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
