//! Slash-command choice lists.
//!
//! Discord shows these as fixed dropdowns; each maps onto the ledger enum it stands for.

use crate::entities::{
    earning::EarningType, purchase::Category, refund::RefundReason, spending::SpendingCategory,
    user::Platform,
};

/// Platform dropdown for `/register`
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum PlatformChoice {
    #[name = "PC"]
    Pc,
    #[name = "PlayStation"]
    PlayStation,
    #[name = "Xbox"]
    Xbox,
    #[name = "Nintendo Switch"]
    NintendoSwitch,
    #[name = "Mobile"]
    Mobile,
}

impl From<PlatformChoice> for Platform {
    fn from(value: PlatformChoice) -> Self {
        match value {
            PlatformChoice::Pc => Self::Pc,
            PlatformChoice::PlayStation => Self::PlayStation,
            PlatformChoice::Xbox => Self::Xbox,
            PlatformChoice::NintendoSwitch => Self::NintendoSwitch,
            PlatformChoice::Mobile => Self::Mobile,
        }
    }
}

/// Purchase category dropdown for `/purchase`
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum PurchaseChoice {
    #[name = "V-Bucks"]
    Vbucks,
    #[name = "Fortnite Crew"]
    Crew,
    #[name = "Quest Pack"]
    Quest,
    #[name = "Skin Pack"]
    Pack,
    #[name = "Other"]
    Other,
}

impl From<PurchaseChoice> for Category {
    fn from(value: PurchaseChoice) -> Self {
        match value {
            PurchaseChoice::Vbucks => Self::Vbucks,
            PurchaseChoice::Crew => Self::Crew,
            PurchaseChoice::Quest => Self::Quest,
            PurchaseChoice::Pack => Self::Pack,
            PurchaseChoice::Other => Self::Other,
        }
    }
}

/// Earning type dropdown for `/earn`. Purchases are recorded with `/purchase`.
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum EarningChoice {
    #[name = "Battle Pass"]
    BattlePass,
    #[name = "Fortnite Crew"]
    Crew,
    #[name = "Quest Pack"]
    Quest,
    #[name = "Other"]
    Other,
}

impl From<EarningChoice> for EarningType {
    fn from(value: EarningChoice) -> Self {
        match value {
            EarningChoice::BattlePass => Self::BattlePass,
            EarningChoice::Crew => Self::Crew,
            EarningChoice::Quest => Self::Quest,
            EarningChoice::Other => Self::Other,
        }
    }
}

/// Item category dropdown for `/spend`
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum SpendingChoice {
    #[name = "Skin"]
    Skin,
    #[name = "Emote"]
    Emote,
    #[name = "Bundle"]
    Bundle,
    #[name = "Gift"]
    Gift,
    #[name = "Battle Pass"]
    BattlePass,
    #[name = "Other"]
    Other,
}

impl From<SpendingChoice> for SpendingCategory {
    fn from(value: SpendingChoice) -> Self {
        match value {
            SpendingChoice::Skin => Self::Skin,
            SpendingChoice::Emote => Self::Emote,
            SpendingChoice::Bundle => Self::Bundle,
            SpendingChoice::Gift => Self::Gift,
            SpendingChoice::BattlePass => Self::BattlePass,
            SpendingChoice::Other => Self::Other,
        }
    }
}

/// Refund reason dropdown for `/refund`
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum ReasonChoice {
    #[name = "Item Disappointed Me"]
    Disappointed,
    #[name = "Accidental Purchase"]
    Accidental,
    #[name = "Other"]
    Other,
}

impl From<ReasonChoice> for RefundReason {
    fn from(value: ReasonChoice) -> Self {
        match value {
            ReasonChoice::Disappointed => Self::Disappointed,
            ReasonChoice::Accidental => Self::Accidental,
            ReasonChoice::Other => Self::Other,
        }
    }
}
