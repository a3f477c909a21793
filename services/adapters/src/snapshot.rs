//! Snapshot assembly
//!
//! Computes summary statistics and the synthetic general lobby from
//! reconciled lobbies. Pure and infallible.

use status_config::SourceConfig;
use types::{GeneralLobby, Lobby, ServerSnapshot, Summary, TotalPolicy};

use crate::reconcile::dedup_names;

/// Per-source inputs to [`assemble`] beyond the lobbies themselves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyPlan {
    /// Configured general lobby name
    pub display_name: String,
    pub total: TotalPolicy,
    /// Upstream-supplied general lobby name, preferred when non-blank
    pub general_name: Option<String>,
    /// Upstream-supplied general lobby count, preferred when present
    pub reported_total: Option<u32>,
}

impl AssemblyPlan {
    pub fn for_source(source: &SourceConfig) -> Self {
        Self {
            display_name: source.display_name.clone(),
            total: source.total,
            general_name: None,
            reported_total: None,
        }
    }

    /// Attach upstream-supplied general lobby details
    pub fn with_upstream(
        mut self,
        general_name: Option<String>,
        reported_total: Option<u32>,
    ) -> Self {
        self.general_name = general_name.filter(|name| !name.trim().is_empty());
        self.reported_total = reported_total;
        self
    }
}

/// Build the snapshot for one source
pub fn assemble(
    source: &str,
    general_players: Vec<String>,
    lobbies: Vec<Lobby>,
    plan: &AssemblyPlan,
) -> ServerSnapshot {
    let players = dedup_names(general_players);

    let active_lobbies = lobbies.iter().filter(|lobby| lobby.is_active()).count() as u32;
    let total_players = match plan.total {
        TotalPolicy::DistinctRoster => players.len() as u32,
        TotalPolicy::SumReportedCounts => lobbies
            .iter()
            .fold(0u32, |sum, lobby| sum.saturating_add(lobby.reported_count)),
    };

    let general_lobby = GeneralLobby {
        name: plan
            .general_name
            .clone()
            .unwrap_or_else(|| plan.display_name.clone()),
        player_count: plan.reported_total.unwrap_or(total_players),
        players,
    };

    ServerSnapshot {
        source: source.to_string(),
        general_lobby,
        lobbies,
        summary: Summary {
            active_lobbies,
            total_players,
        },
    }
}
