//! Navigation client.
//!
//! Drives the server the way a single-page shell does: protocol visits,
//! version-mismatch reloads, partial reloads, history and debounced search.

pub mod debounce;
pub mod error;
pub mod history;
pub mod navigator;
pub mod progress;

pub use debounce::{Debouncer, DEFAULT_DELAY};
pub use error::NavigationError;
pub use history::History;
pub use navigator::{Navigator, Outcome, Visit};
pub use progress::{ActiveVisits, Progress, TracingProgress};
