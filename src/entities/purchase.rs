//! Real-money transaction entity - A purchase paid with real currency.
//!
//! Purchases in a currency-granting category produce a derived earning; see
//! `core::derivation`. The `amount` is money paid, `currency_earned` is V-Bucks received.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What was bought with real money
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Category {
    #[sea_orm(string_value = "VB")]
    Vbucks,
    #[sea_orm(string_value = "CREW")]
    Crew,
    #[sea_orm(string_value = "QUEST")]
    Quest,
    #[sea_orm(string_value = "PACK")]
    Pack,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl Category {
    /// Human-readable category name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vbucks => "V-Bucks",
            Self::Crew => "Fortnite Crew",
            Self::Quest => "Quest Pack",
            Self::Pack => "Skin Pack",
            Self::Other => "Other",
        }
    }
}

/// Real-money transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    pub category: Category,
    /// Exact product name, e.g. "Season 7 Battle Pass"
    pub source_name: String,
    /// Money paid, in `currency`
    pub amount: f64,
    /// V-Bucks received from this purchase (zero for skin packs)
    pub currency_earned: i64,
    pub date: Date,
    /// Three-letter currency code, e.g. "BGN"
    pub currency: String,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
