//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Store operations produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//!
//! Consumers:
//!     → stdout through the tracing-subscriber fmt layer
//!     → whatever metrics recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Logging is observational only; it never changes store behaviour
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
