//! Lobby/player reconciliation
//!
//! Resolves disagreements between a room's reported count and its enumerated
//! occupants, and distributes the source's global roster across rooms. The
//! [`Roster`] moves in by value and comes back with claimed players removed.

use std::collections::HashSet;
use tracing::debug;
use types::{
    Lobby, MismatchPolicy, Occupancy, ReconcilePolicy, RosterAssignment, UnenumeratedPolicy,
};

use crate::sources::RoomRecord;

/// Deduplicate names, keeping the first occurrence of each
pub fn dedup_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Outcome of claiming a player for a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Listed in the roster and now assigned to this room
    Claimed,
    /// An earlier room already holds this player
    Contested,
    /// Not in the roster; kept, and reserved for this room
    Unlisted,
}

/// The source's global roster, consumed as rooms claim players
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    known: HashSet<String>,
    claimed: HashSet<String>,
    unassigned: Vec<String>,
}

impl Roster {
    /// Build from a possibly repeating list of normalized names
    pub fn from_players<I>(players: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let unassigned = dedup_names(players);
        Self {
            known: unassigned.iter().cloned().collect(),
            claimed: HashSet::new(),
            unassigned,
        }
    }

    /// Assign `name` to the room currently being reconciled
    pub fn claim(&mut self, name: &str) -> Claim {
        if self.claimed.contains(name) {
            return Claim::Contested;
        }
        self.claimed.insert(name.to_string());

        if self.known.contains(name) {
            self.unassigned.retain(|candidate| candidate != name);
            Claim::Claimed
        } else {
            Claim::Unlisted
        }
    }

    /// Players no room has claimed, in roster order
    pub fn unassigned(&self) -> &[String] {
        &self.unassigned
    }

    pub fn len(&self) -> usize {
        self.unassigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unassigned.is_empty()
    }
}

/// Reconciled lobbies plus whatever the rooms left of the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub lobbies: Vec<Lobby>,
    pub roster: Roster,
}

/// Reconcile rooms in listing order
pub fn reconcile(
    rooms: Vec<RoomRecord>,
    mut roster: Roster,
    policy: &ReconcilePolicy,
) -> Reconciled {
    let lobbies = rooms
        .into_iter()
        .map(|room| reconcile_room(room, &mut roster, policy))
        .collect();

    Reconciled { lobbies, roster }
}

fn reconcile_room(room: RoomRecord, roster: &mut Roster, policy: &ReconcilePolicy) -> Lobby {
    let players = dedup_names(room.players);

    // Exclusive assignment consumes the roster only; the room keeps what upstream listed
    if policy.assignment == RosterAssignment::Exclusive {
        for player in &players {
            if roster.claim(player) == Claim::Contested {
                debug!(
                    "{} also listed in an earlier room; {} keeps it without a roster claim",
                    player, room.name
                );
            }
        }
    }

    let reported = room.reported_count;
    let listed = players.len() as u32;
    let mut player_count = reported;
    let mut unresolved = 0;

    if listed == 0 {
        if reported > 0 && policy.unenumerated == UnenumeratedPolicy::Empty {
            player_count = 0;
        }
    } else if listed != reported {
        match policy.mismatch {
            MismatchPolicy::TrustList => player_count = listed,
            MismatchPolicy::TrustCount if listed < reported => unresolved = reported - listed,
            MismatchPolicy::TrustCount => player_count = listed,
        }
    }

    let occupancy = if player_count == 0 {
        Occupancy::Empty
    } else if players.is_empty() {
        Occupancy::Joining
    } else {
        Occupancy::Occupied
    };

    Lobby {
        name: room.name,
        player_count,
        reported_count: reported,
        max_players: room.max_players,
        players,
        unresolved,
        occupancy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use status_config::SourceConfig;

    fn room(name: &str, reported_count: u32, players: &[&str]) -> RoomRecord {
        RoomRecord {
            id: None,
            name: name.to_string(),
            reported_count,
            max_players: 12,
            players: players.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn policy(
        mismatch: MismatchPolicy,
        unenumerated: UnenumeratedPolicy,
        assignment: RosterAssignment,
    ) -> ReconcilePolicy {
        ReconcilePolicy {
            mismatch,
            unenumerated,
            assignment,
        }
    }

    fn single(room: RoomRecord, policy: &ReconcilePolicy) -> Lobby {
        reconcile(vec![room], Roster::default(), policy)
            .lobbies
            .remove(0)
    }

    #[test]
    fn test_trust_list_overwrites_count() {
        let lobby = single(
            room("Race", 3, &["A", "B"]),
            &policy(
                MismatchPolicy::TrustList,
                UnenumeratedPolicy::Joining,
                RosterAssignment::Shared,
            ),
        );
        assert_eq!(lobby.player_count, 2);
        assert_eq!(lobby.reported_count, 3);
        assert_eq!(lobby.unresolved, 0);
        assert_eq!(lobby.occupancy, Occupancy::Occupied);
    }

    #[test]
    fn test_trust_count_records_unresolved() {
        let lobby = single(room("Race", 3, &["A", "B"]), &ReconcilePolicy::default());
        assert_eq!(lobby.player_count, 3);
        assert_eq!(lobby.unresolved, 1);

        let lobby = single(room("Race", 1, &["A", "B"]), &ReconcilePolicy::default());
        assert_eq!(lobby.player_count, 2, "count never below the enumerated list");
        assert_eq!(lobby.unresolved, 0);
    }

    #[test]
    fn test_empty_room_is_inactive() {
        let lobby = single(room("Idle", 0, &[]), &ReconcilePolicy::default());
        assert!(!lobby.is_active());
        assert_eq!(lobby.occupancy, Occupancy::Empty);
    }

    #[test]
    fn test_unenumerated_count_is_joining() {
        let lobby = single(room("Filling", 2, &[]), &ReconcilePolicy::default());
        assert!(lobby.is_active());
        assert_eq!(lobby.player_count, 2);
        assert_eq!(lobby.occupancy, Occupancy::Joining);
    }

    #[test]
    fn test_unenumerated_count_zeroed_when_configured() {
        let lobby = single(
            room("Ghost", 2, &[]),
            &policy(
                MismatchPolicy::TrustCount,
                UnenumeratedPolicy::Empty,
                RosterAssignment::Exclusive,
            ),
        );
        assert_eq!(lobby.player_count, 0);
        assert_eq!(lobby.reported_count, 2);
        assert_eq!(lobby.occupancy, Occupancy::Empty);
    }

    #[test]
    fn test_room_list_is_deduplicated() {
        let lobby = single(room("Dup", 2, &["A", "A", "B"]), &ReconcilePolicy::default());
        assert_eq!(lobby.players, vec!["A", "B"]);
        assert_eq!(lobby.player_count, 2);
    }

    #[test]
    fn test_exclusive_assignment_first_room_wins() {
        let roster = Roster::from_players(["A", "B", "C", "A"].map(String::from));
        let reconciled = reconcile(
            vec![room("First", 2, &["A", "B"]), room("Second", 2, &["B", "X"])],
            roster,
            &policy(
                MismatchPolicy::TrustList,
                UnenumeratedPolicy::Joining,
                RosterAssignment::Exclusive,
            ),
        );

        assert_eq!(reconciled.lobbies[0].players, vec!["A", "B"]);
        assert_eq!(reconciled.lobbies[1].players, vec!["B", "X"]);
        assert_eq!(reconciled.lobbies[1].player_count, 2);
        assert_eq!(reconciled.roster.unassigned(), &["C".to_string()]);
    }

    #[test]
    fn test_room_listing_only_contested_players_stays_occupied() {
        let rules = SourceConfig::pacific_rift().reconcile;
        let roster = Roster::from_players(["Blaze".to_string()]);
        let reconciled = reconcile(
            vec![room("Volcano", 1, &["Blaze"]), room("Crater", 1, &["Blaze"])],
            roster,
            &rules,
        );

        let crater = &reconciled.lobbies[1];
        assert_eq!(crater.players, vec!["Blaze"]);
        assert_eq!(crater.player_count, 1);
        assert_ne!(crater.occupancy, Occupancy::Joining);
        assert_eq!(crater.occupancy, Occupancy::Occupied);
        assert!(reconciled.roster.is_empty());
    }

    #[test]
    fn test_shared_assignment_leaves_roster_untouched() {
        let roster = Roster::from_players(["A", "B"].map(String::from));
        let reconciled = reconcile(
            vec![room("One", 1, &["A"]), room("Two", 1, &["A"])],
            roster.clone(),
            &ReconcilePolicy::default(),
        );

        assert_eq!(reconciled.lobbies[1].players, vec!["A"]);
        assert_eq!(reconciled.roster, roster);
    }

    #[test]
    fn test_roster_claims() {
        let mut roster = Roster::from_players(["A".to_string()]);
        assert_eq!(roster.claim("A"), Claim::Claimed);
        assert_eq!(roster.claim("A"), Claim::Contested);
        assert_eq!(roster.claim("Z"), Claim::Unlisted);
        assert_eq!(roster.claim("Z"), Claim::Contested);
        assert!(roster.is_empty());
    }

    proptest! {
        #[test]
        fn prop_dedup_keeps_first_occurrence_order(
            names in prop::collection::vec("[a-d]{1,2}", 0..24)
        ) {
            let deduped = dedup_names(names.clone());

            let unique: HashSet<_> = names.iter().collect();
            prop_assert_eq!(deduped.len(), unique.len());

            let mut expected = Vec::new();
            for name in &names {
                if !expected.contains(name) {
                    expected.push(name.clone());
                }
            }
            prop_assert_eq!(deduped, expected);
        }

        #[test]
        fn prop_occupancy_matches_counts(reported in 0u32..20, listed in 0usize..20) {
            let players: Vec<String> = (0..listed).map(|i| format!("p{}", i)).collect();
            let record = RoomRecord {
                id: None,
                name: "Room".to_string(),
                reported_count: reported,
                max_players: 20,
                players,
            };

            let trust_list = policy(
                MismatchPolicy::TrustList,
                UnenumeratedPolicy::Empty,
                RosterAssignment::Shared,
            );
            for rules in [ReconcilePolicy::default(), trust_list] {
                let lobby = single(record.clone(), &rules);
                prop_assert!(lobby.player_count as usize >= lobby.players.len());
                prop_assert_eq!(lobby.is_active(), lobby.occupancy != Occupancy::Empty);
                if lobby.occupancy == Occupancy::Joining {
                    prop_assert!(lobby.players.is_empty());
                }
            }
        }
    }
}
