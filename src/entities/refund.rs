//! Refund entity - Reverses exactly one spending.
//!
//! `spending_id` is unique, so a spending has at most one refund. `vbucks_returned`
//! is never taken from input; it is copied from the spending before every write.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Why a purchase was refunded
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum RefundReason {
    #[sea_orm(string_value = "DISAPPOINTED")]
    Disappointed,
    #[sea_orm(string_value = "ACCIDENTAL")]
    Accidental,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl RefundReason {
    /// Human-readable reason
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disappointed => "Item Disappointed Me",
            Self::Accidental => "Accidental Purchase",
            Self::Other => "Other",
        }
    }
}

/// Refund database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "refunds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    /// The refunded spending
    #[sea_orm(unique)]
    pub spending_id: i64,
    /// Always equal to the spending's amount
    pub vbucks_returned: i64,
    pub refunded_at: DateTimeUtc,
    pub reason: Option<RefundReason>,
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
    #[sea_orm(
        belongs_to = "super::spending::Entity",
        from = "Column::SpendingId",
        to = "super::spending::Column::Id",
        on_delete = "Cascade"
    )]
    Spending,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::spending::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Spending.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
