//! Entity module - The domain schema and the storage table definitions.
//! `Event` and `BudgetItem` are plain serde types exchanged with storage and sync;
//! `system_state` is the SeaORM key/value table they are persisted into.

/// Budget items, their enums and the item draft
pub mod budget_item;
/// Events and their lifecycle status
pub mod event;
/// Key/value table backing local storage
pub mod system_state;

pub use budget_item::{BudgetItem, ItemCategory, ItemDraft, ItemStatus, PaymentMethod, PaymentPlan};
pub use event::{Event, EventStatus};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
