//! Application layer - owns the event collection and wires the core to storage and sync.

/// Cancellable delayed task used for automatic cloud pushes
pub mod debounce;
/// The state container and the actions it accepts
pub mod state;

pub use debounce::Debouncer;
pub use state::{Action, AppState, SyncStatus, reduce};
