//! # Lobby Status Configuration
//!
//! Static per-source configuration for the lobby status aggregator.
//!
//! ## Features
//!
//! - **Title presets**: endpoint roots, application ids and capacity defaults
//!   for every known upstream title
//! - **Source policies**: name dialect, room-name delimiter, mismatch and
//!   total-player policies, retry budget
//! - **Loading**: TOML files with `STATUS_` environment overrides
//!
//! ## Usage
//!
//! ```rust
//! use status_config::{PollerConfig, SourceConfig};
//!
//! let config = PollerConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let apocalypse = SourceConfig::apocalypse();
//! assert_eq!(apocalypse.max_players_default, 16);
//! ```

pub mod service_config;
pub mod source;
pub mod titles;

pub use service_config::{PollerConfig, ENV_PREFIX};
pub use source::{RetryConfig, SourceConfig};
