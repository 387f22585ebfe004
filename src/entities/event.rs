//! Event entity - A church event and the budget items planned for it.
//!
//! The event date is kept as the `YYYY-MM-DD` string the user picked so it never
//! shifts across time zones; see [`crate::core::date`] for parsing.

use super::BudgetItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an event, set explicitly by the user.
///
/// Any status can be reached from any other; there are no guarded transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Still being planned
    #[default]
    Active,
    /// Took place
    Completed,
    /// Called off
    Cancelled,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// A church event with its budget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Opaque identifier assigned at creation
    pub id: String,
    /// Event name, e.g. "Youth Conference"
    pub name: String,
    /// Calendar date as `YYYY-MM-DD`
    pub date: String,
    /// Short description of purpose or venue
    #[serde(default)]
    pub description: String,
    /// Budget lines in display order
    #[serde(default)]
    pub items: Vec<BudgetItem>,
    /// Kept for compatibility with stored data; no operation changes it
    #[serde(default)]
    pub is_archived: bool,
    /// Lifecycle status
    #[serde(default)]
    pub status: EventStatus,
}

impl Event {
    /// Looks up an item by id.
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&BudgetItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_legacy_event_without_status_defaults_to_active() {
        let json = r#"[{
            "id": "e1",
            "name": "Retiro",
            "date": "2025-03-14",
            "description": "",
            "items": [],
            "isArchived": false
        }]"#;

        let events: Vec<Event> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, EventStatus::Active);
        assert!(!events[0].is_archived);
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = Event {
            id: "e1".to_string(),
            name: "Easter Service".to_string(),
            date: "2025-04-20".to_string(),
            description: String::new(),
            items: Vec::new(),
            is_archived: false,
            status: EventStatus::Completed,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["isArchived"], false);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["date"], "2025-04-20");
    }
}
