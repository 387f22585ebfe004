//! Shared test utilities.
//!
//! This module provides helpers for setting up test databases and building
//! events and items with sensible defaults.

use crate::{
    entities::{BudgetItem, Event, EventStatus, ItemCategory, ItemStatus},
    errors::Result,
    services::storage::EventStore,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Installs a test-friendly tracing subscriber once per test binary.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all storage tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an [`EventStore`] over a fresh in-memory database.
pub async fn setup_test_store() -> Result<EventStore> {
    Ok(EventStore::new(setup_test_db().await?))
}

/// Builds a budget item.
///
/// # Defaults
/// * `category`: Equipment
/// * `supplier`: empty
/// * no notes, no payment details
pub fn sample_item(name: &str, estimated: f64, actual: f64, status: ItemStatus) -> BudgetItem {
    BudgetItem {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        category: ItemCategory::Equipment,
        supplier: String::new(),
        estimated_price: estimated,
        actual_price: actual,
        status,
        discrepancy_notes: None,
        notes: None,
        payment_method: None,
        payment_plan: None,
        installments_count: None,
        reimbursement_recipient: None,
        reimbursement_details: None,
    }
}

/// Builds an active, non-archived event.
pub fn sample_event(name: &str, date: &str, items: Vec<BudgetItem>) -> Event {
    Event {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        date: date.to_string(),
        description: String::new(),
        items,
        is_archived: false,
        status: EventStatus::Active,
    }
}
