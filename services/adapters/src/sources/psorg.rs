//! PSORG revival room dump (JSON)
//!
//! A single call returns every hosted title. The configured application id
//! selects one entry, whose worlds hold game sessions and their clients.

use async_trait::async_trait;
use serde_json::Value;
use status_config::SourceConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use types::{normalize_name, NameRule};

use super::{
    first_str, id_string, one_or_many, NormalizedSource, RawPayload, RoomRecord, SourceAdapter,
};
use crate::error::{AdapterError, FetchError, Result};
use crate::fetcher::HttpFetcher;

const ROOMS_PATH: &str = "GetRooms/";

/// Session names carry the same hex-dash prefix as player names
const SESSION_NAME_RULES: &[NameRule] = &[NameRule::StripHexDashPrefix];

/// Client name fields, in precedence order
const CLIENT_NAME_KEYS: [&str; 2] = ["Name", "PlayerName"];

pub struct PsorgAdapter {
    source: SourceConfig,
}

impl PsorgAdapter {
    pub fn new(source: SourceConfig) -> Self {
        Self { source }
    }

    /// Entry whose `AppId` (string or number) matches the configured id
    fn find_entry<'a>(&self, entries: &'a [Value]) -> Option<&'a Value> {
        let wanted = self.source.app_id.as_str();
        entries
            .iter()
            .find(|entry| id_string(entry.get("AppId")).as_deref() == Some(wanted))
    }

    fn session_record(&self, world_id: &str, session: &Value) -> RoomRecord {
        let players: Vec<String> = one_or_many(session.get("Clients"))
            .into_iter()
            .filter_map(|client| first_str(client, &CLIENT_NAME_KEYS))
            .filter_map(|raw| self.source.names.normalize_opt(raw))
            .collect();

        let name = first_str(session, &["Name"])
            .map(|raw| normalize_name(raw, SESSION_NAME_RULES))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Game Session (World {})", world_id));

        RoomRecord {
            id: None,
            name,
            reported_count: players.len() as u32,
            max_players: self.source.max_players_default,
            players,
        }
    }
}

#[async_trait]
impl SourceAdapter for PsorgAdapter {
    fn source(&self) -> &SourceConfig {
        &self.source
    }

    async fn fetch(
        &self,
        http: &HttpFetcher,
        cancel: &CancellationToken,
    ) -> std::result::Result<RawPayload, FetchError> {
        let rooms = http.get_json(&self.source.endpoint(ROOMS_PATH), cancel).await?;
        Ok(RawPayload::Psorg { rooms })
    }

    fn normalize(&self, raw: RawPayload) -> Result<NormalizedSource> {
        let entries = match raw {
            RawPayload::Psorg {
                rooms: Value::Array(entries),
            } => entries,
            RawPayload::Psorg { .. } => {
                return Err(AdapterError::malformed(
                    &self.source.id,
                    "room dump is not an array",
                ))
            }
            other => {
                return Err(AdapterError::malformed(
                    &self.source.id,
                    format!("expected PSORG room dump, got {} payload", other.kind()),
                ))
            }
        };

        let Some(entry) = self.find_entry(&entries) else {
            info!(
                "{}: AppId {} not present in room dump",
                self.source.id, self.source.app_id
            );
            return Ok(NormalizedSource::default());
        };

        let mut rooms = Vec::new();
        for world in one_or_many(entry.get("Worlds")) {
            let world_id =
                id_string(world.get("WorldId")).unwrap_or_else(|| "Unknown".to_string());

            for session in one_or_many(world.get("GameSessions")) {
                if !session.is_object() {
                    debug!(
                        "{}: skipping non-object session in world {}",
                        self.source.id, world_id
                    );
                    continue;
                }
                rooms.push(self.session_record(&world_id, session));
            }
        }

        let global_players = rooms
            .iter()
            .flat_map(|room| room.players.iter().cloned())
            .collect();

        Ok(NormalizedSource {
            rooms,
            global_players,
            general_name: None,
            reported_total: None,
        })
    }
}
