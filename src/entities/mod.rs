//! Entity module - Contains all SeaORM entity definitions for the ledger.
//! These entities represent the user table and the four ledger collections.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod earning;
pub mod purchase;
pub mod refund;
pub mod spending;
pub mod user;

// Re-export specific types to avoid conflicts
pub use earning::{Column as EarningColumn, Entity as Earning, Model as EarningModel};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use refund::{Column as RefundColumn, Entity as Refund, Model as RefundModel};
pub use spending::{Column as SpendingColumn, Entity as Spending, Model as SpendingModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
