//! Pipeline entry points
//!
//! `get_snapshot` runs fetch, normalize, reconcile and assemble for one
//! source and never fails: errors come back next to the empty sentinel.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use status_config::SourceConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use types::{RosterAssignment, ServerSnapshot};

use crate::error::{AdapterError, Result};
use crate::fetcher::{HttpFetcher, RetryingFetcher};
use crate::reconcile::{reconcile, Reconciled, Roster};
use crate::snapshot::{assemble, AssemblyPlan};
use crate::sources::{adapter_for, NormalizedSource, SourceAdapter};

/// Result of polling one source
#[derive(Debug)]
pub struct PollReport {
    /// Fresh snapshot, or the empty sentinel when `error` is set
    pub snapshot: ServerSnapshot,
    pub error: Option<AdapterError>,
    pub polled_at: DateTime<Utc>,
}

impl PollReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Poll one source end to end
pub async fn get_snapshot(
    source: &SourceConfig,
    http: &HttpFetcher,
    cancel: &CancellationToken,
) -> PollReport {
    let polled_at = Utc::now();
    let adapter = adapter_for(source.clone());

    info!("Polling {} ({})", source.id, source.kind);

    match collect(adapter.as_ref(), http, cancel).await {
        Ok(snapshot) => {
            info!(
                "{}: {} lobbies ({} active), {} players",
                source.id,
                snapshot.lobbies.len(),
                snapshot.summary.active_lobbies,
                snapshot.summary.total_players
            );
            PollReport {
                snapshot,
                error: None,
                polled_at,
            }
        }
        Err(e) => PollReport {
            snapshot: ServerSnapshot::empty(source.id.as_str(), source.display_name.as_str()),
            error: Some(e),
            polled_at,
        },
    }
}

/// Poll every source concurrently, reports in input order
pub async fn poll_all(
    sources: &[SourceConfig],
    http: &HttpFetcher,
    cancel: &CancellationToken,
) -> Vec<PollReport> {
    join_all(
        sources
            .iter()
            .map(|source| get_snapshot(source, http, cancel)),
    )
    .await
}

async fn collect(
    adapter: &dyn SourceAdapter,
    http: &HttpFetcher,
    cancel: &CancellationToken,
) -> Result<ServerSnapshot> {
    let source = adapter.source();
    let retry = RetryingFetcher::new(&source.retry);

    let raw = retry
        .run(&source.id, cancel, move || adapter.fetch(http, cancel))
        .await?;
    let normalized = adapter.normalize(raw)?;

    Ok(build_snapshot(source, normalized))
}

/// Reconcile and assemble an already normalized payload
pub fn build_snapshot(source: &SourceConfig, normalized: NormalizedSource) -> ServerSnapshot {
    let NormalizedSource {
        rooms,
        global_players,
        general_name,
        reported_total,
    } = normalized;

    let roster = Roster::from_players(global_players.iter().cloned());
    let Reconciled { lobbies, roster } = reconcile(rooms, roster, &source.reconcile);

    if source.reconcile.assignment == RosterAssignment::Exclusive && !roster.is_empty() {
        debug!(
            "{}: {} players not seated in any room: {:?}",
            source.id,
            roster.len(),
            roster.unassigned()
        );
    }

    let plan = AssemblyPlan::for_source(source).with_upstream(general_name, reported_total);
    assemble(&source.id, global_players, lobbies, &plan)
}
