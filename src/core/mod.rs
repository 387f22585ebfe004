//! Core business logic - framework-agnostic budget model operations.
//!
//! Pure functions only: no storage, no network. The app state and adapters call
//! into these and decide what to do with the results.

/// Totals, filters and dashboard figures
pub mod aggregate;
/// `YYYY-MM-DD` parsing and days-remaining arithmetic
pub mod date;
/// Event creation and collection edits
pub mod event;
/// Budget item edits and the on-confirm defaulting policy
pub mod item;
/// Currency formatting, printable report and advisory prompt
pub mod report;
