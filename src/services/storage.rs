//! Local persistence of the event collection.
//!
//! The whole collection is written as one JSON document under [`EVENTS_KEY`] in
//! the `system_state` table; every save replaces it entirely. The cloud sync
//! code, when connected, lives under [`SYNC_CODE_KEY`] as plain text.

use crate::{
    entities::{Event, SystemState, system_state},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Key holding the JSON array of events.
pub const EVENTS_KEY: &str = "church_events_data";
/// Key holding the current sync code.
pub const SYNC_CODE_KEY: &str = "church_sync_code";

/// Key/value backed store for events and the sync code.
#[derive(Debug, Clone)]
pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    /// Wraps an open database connection. Tables must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads the raw value stored under `key`.
    #[instrument(skip(self))]
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let state = SystemState::find()
            .filter(system_state::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        Ok(state.map(|s| s.value))
    }

    /// Writes `value` under `key`, replacing any previous value.
    #[instrument(skip(self, value))]
    pub async fn set_value(&self, key: &str, value: String) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();

        let existing = SystemState::find()
            .filter(system_state::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        if let Some(state) = existing {
            let mut active_model: system_state::ActiveModel = state.into();
            active_model.value = Set(value);
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let active_model = system_state::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value),
                updated_at: Set(now),
                ..Default::default()
            };
            active_model.insert(&self.db).await?;
        }

        debug!("Stored value for key '{}'", key);
        Ok(())
    }

    /// Deletes the value under `key`, if any.
    #[instrument(skip(self))]
    pub async fn remove_value(&self, key: &str) -> Result<()> {
        SystemState::delete_many()
            .filter(system_state::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Loads the saved collection, surfacing decode failures.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] if the stored JSON cannot be decoded, or a
    /// database error if the read fails.
    pub async fn try_load_events(&self) -> Result<Vec<Event>> {
        match self.get_value(EVENTS_KEY).await? {
            Some(json) => serde_json::from_str(&json).map_err(|e| Error::Storage {
                message: format!("Saved events could not be decoded: {e}"),
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Loads the saved collection, or an empty one when nothing usable is stored.
    ///
    /// Failures are logged and treated as "no saved data".
    pub async fn load_events(&self) -> Vec<Event> {
        match self.try_load_events().await {
            Ok(events) => {
                info!("Loaded {} saved events", events.len());
                events
            }
            Err(e) => {
                warn!("Ignoring saved data: {}", e);
                Vec::new()
            }
        }
    }

    /// Overwrites the stored collection with `events`.
    pub async fn save_events(&self, events: &[Event]) -> Result<()> {
        let json = serde_json::to_string(events)?;
        self.set_value(EVENTS_KEY, json).await?;
        debug!("Saved {} events", events.len());
        Ok(())
    }

    /// Reads the stored sync code, if connected.
    pub async fn load_sync_code(&self) -> Result<Option<String>> {
        self.get_value(SYNC_CODE_KEY).await
    }

    /// Stores the sync code.
    pub async fn save_sync_code(&self, code: &str) -> Result<()> {
        self.set_value(SYNC_CODE_KEY, code.to_string()).await
    }

    /// Forgets the sync code.
    pub async fn clear_sync_code(&self) -> Result<()> {
        self.remove_value(SYNC_CODE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{ItemStatus, PaymentMethod};
    use crate::test_utils::{init_test_tracing, sample_event, sample_item, setup_test_store};

    #[tokio::test]
    async fn test_load_without_saved_data_is_empty() -> Result<()> {
        let store = setup_test_store().await?;
        assert!(store.load_events().await.is_empty());
        assert!(store.load_sync_code().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() -> Result<()> {
        init_test_tracing();
        let store = setup_test_store().await?;

        let mut confirmed = sample_item("Catering", 200.0, 180.0, ItemStatus::Confirmed);
        confirmed.payment_method = Some(PaymentMethod::Reimbursement);
        confirmed.reimbursement_recipient = Some("Ana".to_string());
        confirmed.installments_count = Some(3);
        let events = vec![
            sample_event("Youth Night", "2025-09-20", vec![confirmed]),
            sample_event("Picnic", "2025-11-02", vec![sample_item("Grill", 150.0, 0.0, ItemStatus::Pending)]),
        ];

        store.save_events(&events).await?;
        assert_eq!(store.try_load_events().await?, events);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_replaces_whole_collection() -> Result<()> {
        let store = setup_test_store().await?;
        store
            .save_events(&[sample_event("A", "2025-01-01", Vec::new()), sample_event("B", "2025-01-02", Vec::new())])
            .await?;
        let only = vec![sample_event("C", "2025-01-03", Vec::new())];
        store.save_events(&only).await?;

        assert_eq!(store.load_events().await, only);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_data_is_treated_as_empty() -> Result<()> {
        let store = setup_test_store().await?;
        store.set_value(EVENTS_KEY, "{not json".to_string()).await?;

        assert!(matches!(
            store.try_load_events().await,
            Err(Error::Storage { .. })
        ));
        assert!(store.load_events().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_sync_code_lifecycle() -> Result<()> {
        let store = setup_test_store().await?;
        store.save_sync_code("ICPBB-ABCD-2345").await?;
        assert_eq!(store.load_sync_code().await?.as_deref(), Some("ICPBB-ABCD-2345"));

        store.save_sync_code("ICPBB-WXYZ-6789").await?;
        assert_eq!(store.load_sync_code().await?.as_deref(), Some("ICPBB-WXYZ-6789"));

        store.clear_sync_code().await?;
        assert!(store.load_sync_code().await?.is_none());
        Ok(())
    }
}
