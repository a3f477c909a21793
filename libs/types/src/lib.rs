//! # Lobby Status Types
//!
//! Shared value types for the lobby status aggregator.
//!
//! ## Contents
//!
//! - **Snapshot model**: [`ServerSnapshot`], [`Lobby`], [`GeneralLobby`], [`Summary`]
//!   and the tri-state [`Occupancy`] consumed by presentation layers
//! - **Per-source policies**: [`SourceKind`], [`ReconcilePolicy`], [`TotalPolicy`]
//!   and friends, carried in static source configuration
//! - **Name canonicalization**: [`NamePolicy`] / [`NameRule`], the per-source
//!   dialect for stripping account decorations
//!
//! ## Usage
//!
//! ```rust
//! use types::{NamePolicy, NameRule, ServerSnapshot};
//!
//! let names = NamePolicy::new(vec![NameRule::StripHexDashPrefix]);
//! assert_eq!(names.normalize("fffff7fb-ZoniBoy0"), "ZoniBoy0");
//!
//! let snapshot = ServerSnapshot::empty("msa", "MotorStorm Apocalypse");
//! assert_eq!(snapshot.summary.total_players, 0);
//! ```

pub mod lobby;
pub mod names;
pub mod policy;

pub use lobby::{GeneralLobby, Lobby, Occupancy, ServerSnapshot, Summary};
pub use names::{normalize_name, NamePolicy, NameRule};
pub use policy::{
    MismatchPolicy, ReconcilePolicy, RosterAssignment, SourceKind, TotalPolicy,
    UnenumeratedPolicy,
};
