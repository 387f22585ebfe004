//! Derived budget figures.
//!
//! Everything here is a pure reduction over events or items: totals for the
//! detail header, per-year sums and chart data for the dashboard, filters and
//! counts for the item list. Nothing is cached; callers recompute on demand.

use crate::{
    core::date::{days_remaining, event_year, parse_event_date},
    core::report::chart_label,
    entities::{BudgetItem, Event, EventStatus, ItemCategory, ItemStatus},
    errors::Result,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Number of events shown in the dashboard charts.
pub const DASHBOARD_CHART_SIZE: usize = 6;

/// The amount an item contributes to an event's budget: the actual price once
/// there is one, the estimate otherwise.
#[must_use]
pub fn item_budget(item: &BudgetItem) -> f64 {
    if item.actual_price > 0.0 {
        item.actual_price
    } else {
        item.estimated_price
    }
}

/// Total budget of an event, preferring actual prices over estimates.
#[must_use]
pub fn total_budget(event: &Event) -> f64 {
    event.items.iter().map(item_budget).sum()
}

/// Sum of estimates over all items regardless of status.
#[must_use]
pub fn total_estimated(items: &[BudgetItem]) -> f64 {
    items.iter().map(|item| item.estimated_price).sum()
}

/// Sum of actual prices over quoted and confirmed items.
#[must_use]
pub fn total_quoted(items: &[BudgetItem]) -> f64 {
    items
        .iter()
        .filter(|item| item.status.is_quoted_or_confirmed())
        .map(|item| item.actual_price)
        .sum()
}

/// Sum of actual prices over confirmed items only.
#[must_use]
pub fn total_confirmed(items: &[BudgetItem]) -> f64 {
    items
        .iter()
        .filter(|item| item.status == ItemStatus::Confirmed)
        .map(|item| item.actual_price)
        .sum()
}

/// Sum of event budgets for events dated in `year`.
///
/// Events whose date has no readable year are left out.
#[must_use]
pub fn year_total(events: &[Event], year: i32) -> f64 {
    events
        .iter()
        .filter(|event| event_year(&event.date).is_ok_and(|y| y == year))
        .map(total_budget)
        .sum()
}

/// One bar of the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTotal {
    /// Event id
    pub id: String,
    /// Full event name
    pub name: String,
    /// Name shortened for chart axes
    pub label: String,
    /// Event budget
    pub total: f64,
}

/// The `n` most expensive events, highest first. Ties keep input order.
#[must_use]
pub fn top_events_by_total(events: &[Event], n: usize) -> Vec<EventTotal> {
    let mut totals: Vec<EventTotal> = events
        .iter()
        .map(|event| EventTotal {
            id: event.id.clone(),
            name: event.name.clone(),
            label: chart_label(&event.name),
            total: total_budget(event),
        })
        .collect();

    // sort_by is stable, so equal totals stay in input order
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(n);
    totals
}

/// True when an item has an actual price that differs from its estimate.
///
/// Prices are compared exactly, as entered.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn has_discrepancy(item: &BudgetItem) -> bool {
    item.actual_price > 0.0 && item.actual_price != item.estimated_price
}

/// True once the event date lies before `today`.
///
/// # Errors
/// Returns a validation error for a malformed event date.
pub fn is_finished(event: &Event, today: NaiveDate) -> Result<bool> {
    Ok(days_remaining(&event.date, today)? < 0)
}

/// Item list filter used by the status tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every item
    #[default]
    All,
    /// Only items with the given status
    Only(ItemStatus),
}

impl StatusFilter {
    /// Whether `item` passes the filter.
    #[must_use]
    pub fn matches(self, item: &BudgetItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => item.status == status,
        }
    }
}

/// Items passing `filter`, in display order.
#[must_use]
pub fn filter_items(items: &[BudgetItem], filter: StatusFilter) -> Vec<&BudgetItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Item counts per status tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    /// Every item
    pub all: usize,
    /// Items still pending
    pub pending: usize,
    /// Items with a quote
    pub quoted: usize,
    /// Confirmed items
    pub confirmed: usize,
}

impl StatusCounts {
    /// Count for a given filter.
    #[must_use]
    pub const fn for_filter(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Only(ItemStatus::Pending) => self.pending,
            StatusFilter::Only(ItemStatus::Quoted) => self.quoted,
            StatusFilter::Only(ItemStatus::Confirmed) => self.confirmed,
        }
    }
}

/// Counts items per status.
#[must_use]
pub fn status_counts(items: &[BudgetItem]) -> StatusCounts {
    items.iter().fold(
        StatusCounts {
            all: items.len(),
            ..StatusCounts::default()
        },
        |mut counts, item| {
            match item.status {
                ItemStatus::Pending => counts.pending += 1,
                ItemStatus::Quoted => counts.quoted += 1,
                ItemStatus::Confirmed => counts.confirmed += 1,
            }
            counts
        },
    )
}

/// Budget per category, in category order, skipping empty categories.
#[must_use]
pub fn category_breakdown(items: &[BudgetItem]) -> Vec<(ItemCategory, f64)> {
    ItemCategory::ALL
        .iter()
        .filter_map(|&category| {
            let in_category: Vec<&BudgetItem> =
                items.iter().filter(|item| item.category == category).collect();
            if in_category.is_empty() {
                None
            } else {
                Some((category, in_category.into_iter().map(item_budget).sum()))
            }
        })
        .collect()
}

/// Events in chronological order. Events with unreadable dates go last.
#[must_use]
pub fn sort_events_by_date(events: &[Event]) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|event| parse_event_date(&event.date).unwrap_or(NaiveDate::MAX));
    sorted
}

/// Figures shown in an event's detail header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventSummary {
    /// Sum of all estimates
    pub estimated: f64,
    /// Sum of actual prices of quoted and confirmed items
    pub quoted: f64,
    /// Sum of actual prices of confirmed items
    pub confirmed: f64,
    /// Actual minus estimate over confirmed items; positive means over budget
    pub variance: f64,
    /// Number of items whose actual price differs from the estimate
    pub discrepancies: usize,
}

/// Computes the detail header figures for one event.
#[must_use]
pub fn event_summary(event: &Event) -> EventSummary {
    let estimated = total_estimated(&event.items);
    let confirmed = total_confirmed(&event.items);
    EventSummary {
        estimated,
        quoted: total_quoted(&event.items),
        confirmed,
        variance: event
            .items
            .iter()
            .filter(|item| item.status == ItemStatus::Confirmed)
            .map(|item| item.actual_price - item.estimated_price)
            .sum(),
        discrepancies: event.items.iter().filter(|item| has_discrepancy(item)).count(),
    }
}

/// Dashboard statistics across all events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Events still being planned and not archived
    pub active_events: usize,
    /// Budget across every event
    pub total_budget: f64,
    /// Budget of events dated in the requested year
    pub year_total: f64,
    /// The most expensive events for the charts
    pub chart: Vec<EventTotal>,
}

/// Computes the dashboard statistics for `year`.
#[must_use]
pub fn dashboard_stats(events: &[Event], year: i32) -> DashboardStats {
    DashboardStats {
        active_events: events
            .iter()
            .filter(|event| event.status == EventStatus::Active && !event.is_archived)
            .count(),
        total_budget: events.iter().map(total_budget).sum(),
        year_total: year_total(events, year),
        chart: top_events_by_total(events, DASHBOARD_CHART_SIZE),
    }
}
