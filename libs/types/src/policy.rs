//! Per-source behavioural policies
//!
//! Upstream titles disagree on which signal is trustworthy (reported count
//! versus enumerated player list) and on how the summary total is computed.
//! These enums make each choice an explicit, named piece of configuration.

use serde::{Deserialize, Serialize};

/// Upstream API shape, selecting the source adapter implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Medius database XML endpoints (lobby listing + filtered player count)
    MediusXml,
    /// Rewired JSON API (rooms, universe roster, per-room detail)
    RewiredJson,
    /// PSORG revival JSON room dump covering many titles
    PsorgRooms,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::MediusXml => write!(f, "medius_xml"),
            SourceKind::RewiredJson => write!(f, "rewired_json"),
            SourceKind::PsorgRooms => write!(f, "psorg_rooms"),
        }
    }
}

/// Resolution when a room enumerates some players but not as many as it reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Overwrite the reported count with the enumerated list length
    TrustList,
    /// Keep the reported count and annotate the remainder as unresolved
    #[default]
    TrustCount,
}

/// Resolution when a room reports occupants but enumerates none
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnenumeratedPolicy {
    /// Keep the count and mark the room as joining
    #[default]
    Joining,
    /// Zero the count and treat the room as empty
    Empty,
}

/// Whether rooms compete for players from the shared roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterAssignment {
    /// Rooms may list the same player; the roster is not consumed
    #[default]
    Shared,
    /// A player belongs to the first room (in listing order) that claims them
    Exclusive,
}

/// Reconciliation behaviour for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilePolicy {
    /// Count/list mismatch resolution
    pub mismatch: MismatchPolicy,
    /// Nonzero count with an empty list
    pub unenumerated: UnenumeratedPolicy,
    /// Roster consumption across rooms
    pub assignment: RosterAssignment,
}

/// How `Summary::total_players` is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalPolicy {
    /// Size of the deduplicated global roster
    #[default]
    DistinctRoster,
    /// Sum of the raw per-room reported counts
    SumReportedCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = ReconcilePolicy::default();
        assert_eq!(policy.mismatch, MismatchPolicy::TrustCount);
        assert_eq!(policy.unenumerated, UnenumeratedPolicy::Joining);
        assert_eq!(policy.assignment, RosterAssignment::Shared);
        assert_eq!(TotalPolicy::default(), TotalPolicy::DistinctRoster);
    }

    #[test]
    fn test_partial_policy_deserializes_with_defaults() {
        let policy: ReconcilePolicy = serde_json::from_str(r#"{"mismatch":"trust_list"}"#).unwrap();
        assert_eq!(policy.mismatch, MismatchPolicy::TrustList);
        assert_eq!(policy.assignment, RosterAssignment::Shared);
    }

    #[test]
    fn test_source_kind_display_matches_serde() {
        for kind in [
            SourceKind::MediusXml,
            SourceKind::RewiredJson,
            SourceKind::PsorgRooms,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.to_string());
        }
    }
}
