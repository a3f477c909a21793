//! # Lobby Status Adapters
//!
//! ## Purpose
//!
//! Turns heterogeneous game-server query APIs into one canonical
//! [`ServerSnapshot`](types::ServerSnapshot) per source. Each poll is a fresh
//! computation; nothing survives between calls except what retry needs.
//!
//! ## Data Flow
//!
//! ```text
//! RetryingFetcher ──(raw payload)──▶ SourceAdapter::normalize
//!       ──(rooms + global roster)──▶ reconcile
//!       ──(lobbies + leftover roster)──▶ assemble ──▶ ServerSnapshot
//! ```
//!
//! ## Components
//!
//! - [`fetcher`]: shared HTTP client and the fixed-delay, cancellable retry loop
//! - [`sources`]: one [`SourceAdapter`] per upstream API shape, selected by
//!   [`SourceKind`](types::SourceKind)
//! - [`reconcile`]: count/list mismatch resolution and cross-room roster
//!   consumption
//! - [`snapshot`]: summary statistics and the synthetic general lobby
//! - [`pipeline`]: `get_snapshot` for one source, `poll_all` for many
//!
//! Failures never cross the source boundary: a failing source degrades to the
//! empty sentinel and reports its error alongside.

pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod reconcile;
pub mod snapshot;
pub mod sources;
pub mod xml;

pub use error::{AdapterError, FetchError, Result};
pub use fetcher::{HttpFetcher, RetryingFetcher};
pub use pipeline::{get_snapshot, poll_all, PollReport};
pub use reconcile::{reconcile, Claim, Reconciled, Roster};
pub use snapshot::{assemble, AssemblyPlan};
pub use sources::{adapter_for, NormalizedSource, RawPayload, RoomRecord, SourceAdapter};
