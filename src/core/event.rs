//! Event business logic - Creating events and editing the event collection.
//!
//! Event-level edits follow the same rule as item edits: they return a new value
//! and leave the input alone. The collection helpers replace, insert or remove
//! whole events by id; the app state applies their result in one assignment.

use crate::{
    core::date::parse_event_date,
    entities::{Event, EventStatus},
    errors::{Error, Result},
};
use uuid::Uuid;

/// Creates a new active event with a fresh id and no items.
///
/// # Errors
/// Returns [`Error::Validation`] if the name is empty or the date is not a
/// valid `YYYY-MM-DD` date.
pub fn create_event(name: &str, date: &str, description: &str) -> Result<Event> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Event name cannot be empty"));
    }
    parse_event_date(date)?;

    Ok(Event {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        date: date.trim().to_string(),
        description: description.to_string(),
        items: Vec::new(),
        is_archived: false,
        status: EventStatus::Active,
    })
}

/// Replaces the name, date and description of an event.
///
/// Required-field checks belong to the caller; see [`create_event`] for the
/// checks applied at creation time.
#[must_use]
pub fn update_event_header(event: &Event, name: &str, date: &str, description: &str) -> Event {
    Event {
        name: name.to_string(),
        date: date.to_string(),
        description: description.to_string(),
        ..event.clone()
    }
}

/// Sets the event status. Every status is reachable from every other.
#[must_use]
pub fn set_event_status(event: &Event, status: EventStatus) -> Event {
    Event {
        status,
        ..event.clone()
    }
}

/// Finds an event by id.
#[must_use]
pub fn find_event<'a>(events: &'a [Event], event_id: &str) -> Option<&'a Event> {
    events.iter().find(|event| event.id == event_id)
}

/// Returns the collection with `event` appended.
#[must_use]
pub fn insert_event(events: &[Event], event: Event) -> Vec<Event> {
    let mut updated = events.to_vec();
    updated.push(event);
    updated
}

/// Returns the collection with the event sharing `updated.id` replaced.
///
/// # Errors
/// Returns [`Error::EventNotFound`] if no event has that id.
pub fn replace_event(events: &[Event], updated: Event) -> Result<Vec<Event>> {
    let position = events
        .iter()
        .position(|event| event.id == updated.id)
        .ok_or_else(|| Error::EventNotFound {
            id: updated.id.clone(),
        })?;

    let mut result = events.to_vec();
    result[position] = updated;
    Ok(result)
}

/// Returns the collection without the event `event_id`. Unknown ids change nothing.
#[must_use]
pub fn delete_event(events: &[Event], event_id: &str) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.id != event_id)
        .cloned()
        .collect()
}
