//! Earning entity - V-Bucks credited to a user.
//!
//! Earnings are either entered directly (battle pass rewards, quests) or derived
//! from a purchase, in which case `name` and `date` match the purchase's
//! `source_name` and `date`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Where the earned V-Bucks came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EarningType {
    #[sea_orm(string_value = "PURCHASE")]
    Purchase,
    #[sea_orm(string_value = "BP")]
    BattlePass,
    #[sea_orm(string_value = "CREW")]
    Crew,
    #[sea_orm(string_value = "QUEST")]
    Quest,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl EarningType {
    /// Human-readable earning type
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Purchase => "V-Bucks Purchase",
            Self::BattlePass => "Battle Pass",
            Self::Crew => "Fortnite Crew",
            Self::Quest => "Quest Pack",
            Self::Other => "Other",
        }
    }
}

/// Earning database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "earnings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub earning_type: EarningType,
    /// V-Bucks credited, always positive
    pub amount: i64,
    pub date: Date,
    /// Optional label; for derived earnings this is the purchase's source name
    pub name: Option<String>,
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
