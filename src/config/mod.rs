//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → StoreConfig (validated)
//!     → ObservationStore::from_config
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new StoreConfig sent to the running process
//!     → retention bound and watchlist updated in place
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal (or absent) config files
//! - Validation separates syntactic (serde) from semantic checks
//! - An invalid reload is logged and the running configuration kept

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::{
    IngestionConfig, ObservabilityConfig, RetentionConfig, StoreConfig, WatchlistConfig,
};
pub use loader::{load_config, ConfigError};
pub use watcher::{ConfigWatcher, LiveConfig, ReloadPlan};
