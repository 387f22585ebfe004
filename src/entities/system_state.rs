//! System state entity - Key/value rows backing local persistence.
//!
//! The whole event collection is stored as one JSON document under a fixed key,
//! and the cloud sync code under another. Writes replace the value wholesale.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System state database model - one key/value pair per row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage key (e.g., `"church_events_data"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Stored value, JSON or plain text depending on the key
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this value was last written
    pub updated_at: DateTime,
}

/// `SystemState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
