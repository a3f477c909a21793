//! Rewired room API (JSON)
//!
//! The room listing only carries counts; occupants come from one detail call
//! per room, issued sequentially in listing order. A failed detail call drops
//! that room and keeps its siblings.

use async_trait::async_trait;
use serde_json::Value;
use status_config::SourceConfig;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{
    as_count, first_str, id_string, one_or_many, NormalizedSource, RawPayload, RoomDetail,
    RoomRecord, SourceAdapter, UNKNOWN_LOBBY,
};
use crate::error::{AdapterError, FetchError, Result};
use crate::fetcher::HttpFetcher;

pub struct RewiredAdapter {
    source: SourceConfig,
}

impl RewiredAdapter {
    pub fn new(source: SourceConfig) -> Self {
        Self { source }
    }

    fn listing_url(&self, path: &str) -> String {
        self.source
            .endpoint(&format!("{}?applicationId={}", path, self.source.app_id))
    }

    fn detail_url(&self, room_id: &str) -> String {
        self.source.endpoint(&format!("rooms/{}", room_id))
    }

    /// Normalized `name` fields of a list of player objects
    fn player_names(&self, players: Option<&Value>) -> Vec<String> {
        one_or_many(players)
            .into_iter()
            .filter_map(|player| match player {
                Value::String(name) => Some(name.as_str()),
                other => first_str(other, &["name"]),
            })
            .filter_map(|raw| self.source.names.normalize_opt(raw))
            .collect()
    }

    /// Room name and occupants from a detail body
    ///
    /// Accepts either an array of objects (players concatenated, first name
    /// wins) or a single object.
    fn read_detail(&self, detail: &Value) -> Option<(Option<String>, Vec<String>)> {
        match detail {
            Value::Array(items) => {
                let name = items
                    .first()
                    .and_then(|first| first_str(first, &["name"]))
                    .map(str::to_string);
                let players = items
                    .iter()
                    .flat_map(|item| self.player_names(item.get("players")))
                    .collect();
                Some((name, players))
            }
            Value::Object(_) => {
                let name = first_str(detail, &["name"]).map(str::to_string);
                Some((name, self.player_names(detail.get("players"))))
            }
            _ => None,
        }
    }

    fn partial_room(&self, room: &str, reason: impl Into<String>) {
        let err = AdapterError::PartialRoom {
            source_id: self.source.id.clone(),
            room: room.to_string(),
            reason: reason.into(),
        };
        warn!("{}", err);
    }
}

/// Ids of listed rooms, in listing order
fn room_ids(rooms: &Value) -> Vec<String> {
    rooms
        .as_array()
        .map(|rooms| rooms.iter().filter_map(|room| id_string(room.get("id"))).collect())
        .unwrap_or_default()
}

#[async_trait]
impl SourceAdapter for RewiredAdapter {
    fn source(&self) -> &SourceConfig {
        &self.source
    }

    async fn fetch(
        &self,
        http: &HttpFetcher,
        cancel: &CancellationToken,
    ) -> std::result::Result<RawPayload, FetchError> {
        let rooms = http.get_json(&self.listing_url("rooms"), cancel).await?;
        let players = http
            .get_json(&self.listing_url("universes/players"), cancel)
            .await?;
        let universe = if self.source.fetch_universe {
            Some(http.get_json(&self.listing_url("universes"), cancel).await?)
        } else {
            None
        };

        let mut details = Vec::new();
        for room_id in room_ids(&rooms) {
            let body = match http.get_json(&self.detail_url(&room_id), cancel).await {
                Ok(body) => Ok(body),
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => Err(e.to_string()),
            };
            details.push(RoomDetail { room_id, body });
        }

        Ok(RawPayload::Rewired {
            rooms,
            players,
            universe,
            details,
        })
    }

    fn normalize(&self, raw: RawPayload) -> Result<NormalizedSource> {
        let (rooms, players, universe, details) = match raw {
            RawPayload::Rewired {
                rooms,
                players,
                universe,
                details,
            } => (rooms, players, universe, details),
            other => {
                return Err(AdapterError::malformed(
                    &self.source.id,
                    format!("expected Rewired JSON, got {} payload", other.kind()),
                ))
            }
        };

        let rooms = match rooms {
            Value::Array(rooms) => rooms,
            _ => {
                return Err(AdapterError::malformed(
                    &self.source.id,
                    "room listing is not an array",
                ))
            }
        };
        if !players.is_array() {
            return Err(AdapterError::malformed(
                &self.source.id,
                "universe player list is not an array",
            ));
        }

        let global_players = self.player_names(Some(&players));

        let universe_entry = universe
            .as_ref()
            .and_then(|universe| one_or_many(Some(universe)).into_iter().next());
        let (general_name, reported_total) = match universe_entry {
            Some(universe) => (
                first_str(universe, &["name"]).map(str::to_string),
                as_count(universe.get("playerCount")),
            ),
            None => (None, None),
        };

        let details: HashMap<&str, &std::result::Result<Value, String>> = details
            .iter()
            .map(|detail| (detail.room_id.as_str(), &detail.body))
            .collect();

        let mut records = Vec::with_capacity(rooms.len());
        for room in &rooms {
            if !room.is_object() {
                debug!("{}: skipping non-object room entry", self.source.id);
                continue;
            }
            let Some(room_id) = id_string(room.get("id")) else {
                debug!("{}: skipping room without an id", self.source.id);
                continue;
            };

            let detail = match details.get(room_id.as_str()) {
                Some(Ok(detail)) => detail,
                Some(Err(reason)) => {
                    self.partial_room(&room_id, reason.as_str());
                    continue;
                }
                None => {
                    self.partial_room(&room_id, "no detail response");
                    continue;
                }
            };

            let Some((detail_name, players)) = self.read_detail(detail) else {
                self.partial_room(&room_id, "detail is neither an object nor an array");
                continue;
            };

            let name = detail_name
                .or_else(|| first_str(room, &["name"]).map(str::to_string))
                .unwrap_or_else(|| UNKNOWN_LOBBY.to_string());

            records.push(RoomRecord {
                id: Some(room_id),
                name: self.source.trim_room_name(&name).to_string(),
                reported_count: as_count(room.get("playerCount")).unwrap_or(0),
                max_players: as_count(room.get("maxPlayers"))
                    .filter(|max| *max > 0)
                    .unwrap_or(self.source.max_players_default),
                players,
            });
        }

        Ok(NormalizedSource {
            rooms: records,
            global_players,
            general_name,
            reported_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapter() -> RewiredAdapter {
        RewiredAdapter::new(
            SourceConfig::monument_valley().with_base_url("http://rewired.test/us/api"),
        )
    }

    fn detail(room_id: &str, body: Value) -> RoomDetail {
        RoomDetail {
            room_id: room_id.to_string(),
            body: Ok(body),
        }
    }

    #[test]
    fn test_urls_carry_application_id() {
        let adapter = adapter();
        assert_eq!(
            adapter.listing_url("universes/players"),
            "http://rewired.test/us/api/universes/players?applicationId=20764"
        );
        assert_eq!(adapter.detail_url("42"), "http://rewired.test/us/api/rooms/42");
    }

    #[test]
    fn test_room_ids_accept_numbers_and_strings() {
        let rooms = json!([{"id": 7}, {"id": "abc"}, {"name": "no id"}]);
        assert_eq!(room_ids(&rooms), vec!["7", "abc"]);
        assert!(room_ids(&json!({"id": 1})).is_empty());
    }

    #[test]
    fn test_normalize_detail_shapes() {
        let raw = RawPayload::Rewired {
            rooms: json!([
                {"id": 1, "name": "Listing Name", "playerCount": 2, "maxPlayers": 10},
                {"id": 2, "playerCount": 1},
                {"id": 3, "name": "Broken", "playerCount": 4}
            ]),
            players: json!([{"name": "0001a2b3-Alpha"}, {"name": "Bravo"}]),
            universe: Some(json!([{"name": "MotorStorm NTSC", "playerCount": 5}])),
            details: vec![
                detail(
                    "1",
                    json!([
                        {"name": "Detail Name", "players": [{"name": "0001a2b3-Alpha"}]},
                        {"players": [{"name": "Bravo"}]}
                    ]),
                ),
                detail("2", json!({"players": [{"name": "ffff-Charlie"}]})),
                RoomDetail {
                    room_id: "3".to_string(),
                    body: Err("HTTP 500".to_string()),
                },
            ],
        };

        let normalized = adapter().normalize(raw).unwrap();

        assert_eq!(normalized.global_players, vec!["Alpha", "Bravo"]);
        assert_eq!(normalized.general_name.as_deref(), Some("MotorStorm NTSC"));
        assert_eq!(normalized.reported_total, Some(5));

        assert_eq!(normalized.rooms.len(), 2, "failed detail omits only that room");
        assert_eq!(normalized.rooms[0].name, "Detail Name");
        assert_eq!(normalized.rooms[0].players, vec!["Alpha", "Bravo"]);
        assert_eq!(normalized.rooms[0].max_players, 10);

        assert_eq!(normalized.rooms[1].name, UNKNOWN_LOBBY);
        assert_eq!(normalized.rooms[1].players, vec!["Charlie"]);
        assert_eq!(normalized.rooms[1].max_players, 12);
    }

    #[test]
    fn test_listing_must_be_an_array() {
        let raw = RawPayload::Rewired {
            rooms: json!({"error": "maintenance"}),
            players: json!([]),
            universe: None,
            details: Vec::new(),
        };
        assert!(matches!(
            adapter().normalize(raw),
            Err(AdapterError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_wrong_payload_kind_is_malformed() {
        let raw = RawPayload::Psorg { rooms: json!([]) };
        assert!(adapter().normalize(raw).is_err());
    }
}
