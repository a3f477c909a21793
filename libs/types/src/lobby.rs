//! Canonical lobby and snapshot model
//!
//! These values are the only contract between the aggregation pipeline and
//! the presentation layer. They are rebuilt from scratch on every poll.

use serde::{Deserialize, Serialize};

/// Room state as displayed to users
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    /// No occupants reported
    #[default]
    Empty,
    /// Occupants reported but none enumerated yet (join in progress)
    Joining,
    /// At least one enumerated occupant
    Occupied,
}

/// A reconciled upstream room or session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lobby {
    /// Display name with any disposable suffix removed
    pub name: String,
    /// Occupant count after the source's mismatch policy
    pub player_count: u32,
    /// Occupant count exactly as upstream reported it
    pub reported_count: u32,
    /// Capacity, defaulted per source when upstream omits it
    pub max_players: u32,
    /// Enumerated occupants, deduplicated in first-occurrence order
    pub players: Vec<String>,
    /// Occupants counted but not enumerated ("+N more")
    pub unresolved: u32,
    /// Tri-state display status
    pub occupancy: Occupancy,
}

impl Lobby {
    /// A lobby is active while it holds at least one occupant
    pub fn is_active(&self) -> bool {
        self.player_count > 0
    }
}

/// Synthetic lobby holding every player known to a source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLobby {
    pub name: String,
    pub player_count: u32,
    pub players: Vec<String>,
}

/// Summary statistics for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub active_lobbies: u32,
    pub total_players: u32,
}

/// Complete status of one source at one poll
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    /// Source identifier from configuration
    pub source: String,
    pub general_lobby: GeneralLobby,
    /// Lobbies in upstream listing order
    pub lobbies: Vec<Lobby>,
    pub summary: Summary,
}

impl ServerSnapshot {
    /// The "no data" sentinel: zero lobbies and zero players
    pub fn empty(source: impl Into<String>, general_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            general_lobby: GeneralLobby {
                name: general_name.into(),
                player_count: 0,
                players: Vec::new(),
            },
            lobbies: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// True for the sentinel and for genuinely idle sources alike
    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty() && self.general_lobby.players.is_empty()
    }

    /// Lobbies currently holding players
    pub fn active_lobbies(&self) -> impl Iterator<Item = &Lobby> {
        self.lobbies.iter().filter(|lobby| lobby.is_active())
    }
}
