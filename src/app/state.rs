//! Application state container.
//!
//! `AppState` owns the event collection and is the only place it changes. Every
//! edit goes through [`AppState::dispatch`]: the action is applied with the pure
//! core functions, the resulting collection replaces the old one in full, the
//! collection is saved locally and, when the device is connected to the cloud,
//! a debounced push of the new state is scheduled.

use crate::{
    app::debounce::Debouncer,
    config::settings::SyncConfig,
    core::{event, item},
    entities::{Event, EventStatus, ItemDraft, ItemStatus},
    errors::{Error, Result},
    services::{
        storage::EventStore,
        sync::{SyncBackend, generate_sync_code, normalize_sync_code},
    },
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{error, info, instrument, warn};

/// Cloud sync status shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// Code this device is connected with, if any
    pub sync_code: Option<String>,
    /// When the last successful push or pull finished
    pub last_synced: Option<DateTime<Utc>>,
    /// A push or pull is in flight
    pub is_syncing: bool,
    /// Message of the last failure, cleared by the next success
    pub error: Option<String>,
}

/// Every change a user can make to the data.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Create a new event with no items
    CreateEvent {
        /// Event name; must not be blank
        name: String,
        /// `YYYY-MM-DD` date
        date: String,
        /// Free-text description
        description: String,
    },
    /// Replace name, date and description of an event
    UpdateEventHeader {
        /// Event to edit
        event_id: String,
        /// New name
        name: String,
        /// New `YYYY-MM-DD` date
        date: String,
        /// New description
        description: String,
    },
    /// Set the lifecycle status of an event
    SetEventStatus {
        /// Event to edit
        event_id: String,
        /// New status
        status: EventStatus,
    },
    /// Delete an event; clears the selection if it pointed at it
    DeleteEvent {
        /// Event to delete
        event_id: String,
    },
    /// Add an item to an event
    AddItem {
        /// Event receiving the item
        event_id: String,
        /// User input for the new item
        draft: ItemDraft,
    },
    /// Remove an item from an event
    RemoveItem {
        /// Event owning the item
        event_id: String,
        /// Item to remove
        item_id: String,
    },
    /// Change a single item field
    UpdateItemField {
        /// Event owning the item
        event_id: String,
        /// Item to edit
        item_id: String,
        /// Field and its new value
        field: item::ItemField,
    },
    /// Change an item status, applying the on-confirm defaults
    SetItemStatus {
        /// Event owning the item
        event_id: String,
        /// Item to edit
        item_id: String,
        /// New status
        status: ItemStatus,
    },
    /// Open an event's detail view, or close it with `None`
    SelectEvent(Option<String>),
}

/// Applies `f` to the event `event_id` and puts the result back in the collection.
fn edit_event<F>(events: &[Event], event_id: &str, f: F) -> Result<Vec<Event>>
where
    F: FnOnce(&Event) -> Result<Event>,
{
    let current = event::find_event(events, event_id).ok_or_else(|| Error::EventNotFound {
        id: event_id.to_string(),
    })?;
    event::replace_event(events, f(current)?)
}

/// Computes the collection that results from a data-changing action.
///
/// # Errors
/// Validation errors from the core functions and [`Error::EventNotFound`] for
/// edits that name an unknown event.
pub fn reduce(events: &[Event], action: Action) -> Result<Vec<Event>> {
    match action {
        Action::CreateEvent {
            name,
            date,
            description,
        } => Ok(event::insert_event(
            events,
            event::create_event(&name, &date, &description)?,
        )),
        Action::UpdateEventHeader {
            event_id,
            name,
            date,
            description,
        } => edit_event(events, &event_id, |e| {
            Ok(event::update_event_header(e, &name, &date, &description))
        }),
        Action::SetEventStatus { event_id, status } => {
            edit_event(events, &event_id, |e| Ok(event::set_event_status(e, status)))
        }
        Action::DeleteEvent { event_id } => Ok(event::delete_event(events, &event_id)),
        Action::AddItem { event_id, draft } => {
            edit_event(events, &event_id, |e| item::add_item(e, draft))
        }
        Action::RemoveItem { event_id, item_id } => {
            edit_event(events, &event_id, |e| Ok(item::remove_item(e, &item_id)))
        }
        Action::UpdateItemField {
            event_id,
            item_id,
            field,
        } => edit_event(events, &event_id, |e| {
            item::update_item_field(e, &item_id, field)
        }),
        Action::SetItemStatus {
            event_id,
            item_id,
            status,
        } => edit_event(events, &event_id, |e| {
            Ok(item::set_item_status(e, &item_id, status))
        }),
        Action::SelectEvent(_) => Ok(events.to_vec()),
    }
}

fn update_status<F: FnOnce(&mut SyncStatus)>(status: &Mutex<SyncStatus>, f: F) {
    match status.lock() {
        Ok(mut guard) => f(&mut guard),
        Err(poisoned) => f(&mut poisoned.into_inner()),
    }
}

/// Pushes `events` under `code` and records the outcome in `status`.
async fn push_and_record(
    remote: Arc<dyn SyncBackend>,
    status: Arc<Mutex<SyncStatus>>,
    code: String,
    events: Vec<Event>,
) -> Result<()> {
    update_status(&status, |s| s.is_syncing = true);
    let result = remote.push(&code, &events).await;
    update_status(&status, |s| {
        s.is_syncing = false;
        match &result {
            Ok(()) => {
                s.last_synced = Some(Utc::now());
                s.error = None;
            }
            Err(e) => s.error = Some(e.to_string()),
        }
    });
    if let Err(e) = &result {
        warn!("Cloud push failed, local data kept: {}", e);
    }
    result
}

/// Single owner of the in-memory event collection.
pub struct AppState {
    events: Vec<Event>,
    selected_event: Option<String>,
    store: EventStore,
    remote: Arc<dyn SyncBackend>,
    sync: Arc<Mutex<SyncStatus>>,
    code_prefix: String,
    autosync: Debouncer,
}

impl AppState {
    /// Loads saved events and the stored sync code.
    ///
    /// Unreadable saved data is logged and treated as empty.
    #[instrument(skip_all)]
    pub async fn load(store: EventStore, remote: Arc<dyn SyncBackend>, config: &SyncConfig) -> Self {
        let events = store.load_events().await;
        let sync_code = store.load_sync_code().await.unwrap_or_else(|e| {
            warn!("Could not read sync code: {}", e);
            None
        });
        if let Some(code) = &sync_code {
            info!("Connected to cloud with code {}", code);
        }

        Self {
            events,
            selected_event: None,
            store,
            remote,
            sync: Arc::new(Mutex::new(SyncStatus {
                sync_code,
                ..SyncStatus::default()
            })),
            code_prefix: config.code_prefix.clone(),
            autosync: Debouncer::new(config.debounce()),
        }
    }

    /// All events in insertion order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Looks up an event by id.
    #[must_use]
    pub fn event(&self, event_id: &str) -> Option<&Event> {
        event::find_event(&self.events, event_id)
    }

    /// The event whose detail view is open, if any.
    #[must_use]
    pub fn selected_event(&self) -> Option<&Event> {
        self.selected_event
            .as_deref()
            .and_then(|id| self.event(id))
    }

    /// Snapshot of the sync status.
    #[must_use]
    pub fn sync_status(&self) -> SyncStatus {
        match self.sync.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// True while an automatic push is waiting or running.
    #[must_use]
    pub fn has_pending_sync(&self) -> bool {
        self.autosync.is_pending()
    }

    fn sync_code(&self) -> Option<String> {
        self.sync_status().sync_code
    }

    /// Applies a user action. On error nothing changes.
    ///
    /// # Errors
    /// Validation errors and [`Error::EventNotFound`]; persistence and sync
    /// failures are logged and never returned here.
    pub async fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::SelectEvent(selection) => {
                self.selected_event = selection.filter(|id| self.event(id).is_some());
                Ok(())
            }
            Action::DeleteEvent { event_id } => {
                if self.selected_event.as_deref() == Some(event_id.as_str()) {
                    self.selected_event = None;
                }
                let updated = reduce(&self.events, Action::DeleteEvent { event_id })?;
                self.commit(updated).await;
                Ok(())
            }
            other => {
                let updated = reduce(&self.events, other)?;
                self.commit(updated).await;
                Ok(())
            }
        }
    }

    /// Replaces the collection, saves it and schedules the automatic push.
    async fn commit(&mut self, events: Vec<Event>) {
        self.events = events;
        if let Err(e) = self.store.save_events(&self.events).await {
            error!("Failed to save events locally: {}", e);
        }
        self.schedule_autosync();
    }

    fn schedule_autosync(&mut self) {
        let Some(code) = self.sync_code() else {
            return;
        };
        let task = push_and_record(
            Arc::clone(&self.remote),
            Arc::clone(&self.sync),
            code,
            self.events.clone(),
        );
        self.autosync.schedule(async move {
            let _ = task.await;
        });
    }

    /// Connects this device under a newly generated code and pushes right away.
    ///
    /// Returns the code so it can be shared with other devices. A failed push is
    /// recorded in the sync status; the device stays connected.
    ///
    /// # Errors
    /// Returns an error if the code cannot be stored locally.
    pub async fn connect_new(&mut self) -> Result<String> {
        let code = generate_sync_code(&self.code_prefix);
        self.store.save_sync_code(&code).await?;
        update_status(&self.sync, |s| {
            s.sync_code = Some(code.clone());
            s.error = None;
        });
        info!("Created sync code {}", code);

        self.autosync.cancel();
        let _ = push_and_record(
            Arc::clone(&self.remote),
            Arc::clone(&self.sync),
            code.clone(),
            self.events.clone(),
        )
        .await;
        Ok(code)
    }

    /// Connects to an existing code and replaces local data with the cloud copy.
    ///
    /// Returns `false` when the code has no data or the pull fails; local events,
    /// the current code and any pending automatic push are then left untouched
    /// and the reason is recorded in the sync status.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for an empty or malformed code.
    pub async fn connect_existing(&mut self, code: &str) -> Result<bool> {
        let code = normalize_sync_code(code)?;
        update_status(&self.sync, |s| s.is_syncing = true);

        match self.remote.pull(&code).await {
            Ok(Some(events)) => {
                self.autosync.cancel();
                info!("Replacing local data with {} events from cloud", events.len());
                self.events = events;
                if self
                    .selected_event
                    .as_deref()
                    .is_some_and(|id| event::find_event(&self.events, id).is_none())
                {
                    self.selected_event = None;
                }
                if let Err(e) = self.store.save_events(&self.events).await {
                    error!("Failed to save pulled events locally: {}", e);
                }
                if let Err(e) = self.store.save_sync_code(&code).await {
                    error!("Failed to store sync code: {}", e);
                }
                update_status(&self.sync, |s| {
                    s.sync_code = Some(code.clone());
                    s.last_synced = Some(Utc::now());
                    s.is_syncing = false;
                    s.error = None;
                });
                Ok(true)
            }
            Ok(None) => {
                warn!("No cloud data for code {}", code);
                update_status(&self.sync, |s| {
                    s.is_syncing = false;
                    s.error = Some(format!("No data found for code {code}"));
                });
                Ok(false)
            }
            Err(e) => {
                warn!("Cloud pull failed, local data kept: {}", e);
                update_status(&self.sync, |s| {
                    s.is_syncing = false;
                    s.error = Some(e.to_string());
                });
                Ok(false)
            }
        }
    }

    /// Pulls the cloud copy for the current code, if connected.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the device is not connected.
    pub async fn refresh_from_cloud(&mut self) -> Result<bool> {
        let code = self
            .sync_code()
            .ok_or_else(|| Error::validation("Not connected to cloud sync"))?;
        self.connect_existing(&code).await
    }

    /// Pushes the current state immediately, replacing any pending automatic push.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the device is not connected and the
    /// push error when it fails (also recorded in the sync status).
    pub async fn sync_now(&mut self) -> Result<()> {
        let code = self
            .sync_code()
            .ok_or_else(|| Error::validation("Not connected to cloud sync"))?;
        self.autosync.cancel();
        push_and_record(
            Arc::clone(&self.remote),
            Arc::clone(&self.sync),
            code,
            self.events.clone(),
        )
        .await
    }

    /// Disconnects from cloud sync. Local data is kept.
    ///
    /// # Errors
    /// Returns an error if the stored code cannot be removed.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.autosync.cancel();
        self.store.clear_sync_code().await?;
        update_status(&self.sync, |s| *s = SyncStatus::default());
        info!("Disconnected from cloud sync");
        Ok(())
    }
}
