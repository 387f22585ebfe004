//! External collaborators: local persistence, cloud sync and budget advice.
//!
//! The core never calls these; the app state and the binary wire them up.

/// Budget advice from a text-generation API
pub mod advisory;
/// Local key/value persistence of the event collection
pub mod storage;
/// Cloud push/pull keyed by a shareable code
pub mod sync;

pub use advisory::{Advisor, FALLBACK_ADVICE, GeminiAdvisor};
pub use storage::EventStore;
pub use sync::{HttpSyncBackend, InMemorySyncBackend, SyncBackend, generate_sync_code};
