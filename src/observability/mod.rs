//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Renderer, handlers, client:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (render counters and latency)
//!
//! Request spans and x-request-id come from http::request.
//! ```

pub mod logging;
pub mod metrics;
