//! Spending entity - V-Bucks spent in the item shop.
//!
//! The `refunded` flag mirrors whether a refund row references this spending.
//! Only the refund state machine in `core::refund` flips it.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of item bought with V-Bucks
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum SpendingCategory {
    #[sea_orm(string_value = "SKIN")]
    Skin,
    #[sea_orm(string_value = "EMOTE")]
    Emote,
    #[sea_orm(string_value = "BUNDLE")]
    Bundle,
    #[sea_orm(string_value = "GIFT")]
    Gift,
    #[sea_orm(string_value = "BP")]
    BattlePass,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl SpendingCategory {
    /// Human-readable category name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skin => "Skin",
            Self::Emote => "Emote",
            Self::Bundle => "Bundle",
            Self::Gift => "Gift",
            Self::BattlePass => "Battle Pass",
            Self::Other => "Other",
        }
    }
}

/// Spending database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "spendings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub item_name: String,
    pub category: SpendingCategory,
    /// V-Bucks spent, always positive
    pub amount: i64,
    pub date: Date,
    /// True while a refund references this spending
    pub refunded: bool,
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
    #[sea_orm(has_one = "super::refund::Entity")]
    Refund,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::refund::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Refund.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
