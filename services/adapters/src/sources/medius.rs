//! Medius database API (XML)
//!
//! Two documents per poll: `GetLobbyListing` with one `Lobby` element per
//! game and an inline comma-separated roster, and `GetPlayerCount` with one
//! `Player` element per connected account.

use async_trait::async_trait;
use status_config::SourceConfig;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{
    parse_count, split_inline_list, NormalizedSource, RawPayload, RoomRecord, SourceAdapter,
    UNKNOWN_LOBBY,
};
use crate::error::{AdapterError, FetchError, Result};
use crate::fetcher::HttpFetcher;
use crate::xml::Element;

const LISTING_ROOT: &str = "GetLobbyListing";
const PLAYERS_ROOT: &str = "GetPlayerCount";

/// Candidate name locations, in precedence order
const NAME_KEYS: [&str; 4] = ["AccountName", "accountName", "name", "Name"];

pub struct MediusAdapter {
    source: SourceConfig,
}

impl MediusAdapter {
    pub fn new(source: SourceConfig) -> Self {
        Self { source }
    }

    fn listing_url(&self) -> String {
        self.source
            .endpoint(&format!("{}?AppId={}", LISTING_ROOT, self.source.app_id))
    }

    fn players_url(&self) -> String {
        self.source.endpoint(&format!(
            "{}?filter=FILTER_APP_ID&arg={}",
            PLAYERS_ROOT, self.source.app_id
        ))
    }

    fn lobby_record(&self, lobby: &Element) -> RoomRecord {
        let players = lobby
            .attr("PlayerListCurrent")
            .map(|list| {
                split_inline_list(list)
                    .filter_map(|token| self.source.names.normalize_opt(token))
                    .collect()
            })
            .unwrap_or_default();

        let name = lobby
            .attr("GameName")
            .map(|raw| self.source.trim_room_name(raw))
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_LOBBY);

        RoomRecord {
            id: None,
            name: name.to_string(),
            reported_count: lobby.attr("PlayerCount").and_then(parse_count).unwrap_or(0),
            max_players: lobby
                .attr("MaxPlayers")
                .and_then(parse_count)
                .filter(|max| *max > 0)
                .unwrap_or(self.source.max_players_default),
            players,
        }
    }
}

/// Account name of a `Player` element
fn player_name(player: &Element) -> Option<&str> {
    let non_blank = |value: &&str| !value.trim().is_empty();

    NAME_KEYS
        .iter()
        .filter_map(|key| player.attr(key))
        .find(non_blank)
        .or_else(|| {
            NAME_KEYS
                .iter()
                .filter_map(|key| player.child(key).and_then(Element::text))
                .find(non_blank)
        })
        .or_else(|| {
            let account = player.child("Account")?;
            ["Name", "name"]
                .iter()
                .filter_map(|key| account.child(key).and_then(Element::text))
                .find(non_blank)
        })
}

#[async_trait]
impl SourceAdapter for MediusAdapter {
    fn source(&self) -> &SourceConfig {
        &self.source
    }

    async fn fetch(
        &self,
        http: &HttpFetcher,
        cancel: &CancellationToken,
    ) -> std::result::Result<RawPayload, FetchError> {
        let listing = http.get_xml(&self.listing_url(), cancel).await?;
        let players = http.get_xml(&self.players_url(), cancel).await?;
        Ok(RawPayload::Medius { listing, players })
    }

    fn normalize(&self, raw: RawPayload) -> Result<NormalizedSource> {
        let (listing, players) = match raw {
            RawPayload::Medius { listing, players } => (listing, players),
            other => {
                return Err(AdapterError::malformed(
                    &self.source.id,
                    format!("expected Medius documents, got {} payload", other.kind()),
                ))
            }
        };

        if listing.name != LISTING_ROOT {
            return Err(AdapterError::malformed(
                &self.source.id,
                format!("lobby listing root is <{}>", listing.name),
            ));
        }
        if players.name != PLAYERS_ROOT {
            return Err(AdapterError::malformed(
                &self.source.id,
                format!("player list root is <{}>", players.name),
            ));
        }

        let mut global_players = Vec::new();
        for player in players.children_named("Player") {
            match player_name(player).and_then(|raw| self.source.names.normalize_opt(raw)) {
                Some(name) => global_players.push(name),
                None => debug!(
                    "{}: skipping Player element without a usable name",
                    self.source.id
                ),
            }
        }

        let total_entries = listing.attr("totalEntries").and_then(parse_count).unwrap_or(0);
        let rooms = if total_entries > 0 {
            listing
                .children_named("Lobby")
                .map(|lobby| self.lobby_record(lobby))
                .collect()
        } else {
            Vec::new()
        };

        Ok(NormalizedSource {
            rooms,
            global_players,
            general_name: None,
            reported_total: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> MediusAdapter {
        MediusAdapter::new(SourceConfig::arctic_edge().with_base_url("http://medius.test/api"))
    }

    fn payload(listing: &str, players: &str) -> RawPayload {
        RawPayload::Medius {
            listing: Element::parse(listing).unwrap(),
            players: Element::parse(players).unwrap(),
        }
    }

    #[test]
    fn test_urls_carry_app_id() {
        let adapter = adapter();
        assert_eq!(
            adapter.listing_url(),
            "http://medius.test/api/GetLobbyListing?AppId=22204"
        );
        assert_eq!(
            adapter.players_url(),
            "http://medius.test/api/GetPlayerCount?filter=FILTER_APP_ID&arg=22204"
        );
    }

    #[test]
    fn test_normalize_lobbies_and_players() {
        let normalized = adapter()
            .normalize(payload(
                r#"<GetLobbyListing totalEntries="2">
                     <Lobby GameName="Ice Race~ab12" PlayerCount="3" MaxPlayers="6"
                            PlayerListCurrent="Alpha PS3, Bravo PS3,Alpha"/>
                     <Lobby PlayerCount="0"/>
                   </GetLobbyListing>"#,
                r#"<GetPlayerCount>
                     <Player AccountName="Alpha PS3"/>
                     <Player><name>Bravo PS3</name></Player>
                     <Player><Account><Name>Charlie</Name></Account></Player>
                     <Player AccountName="  "/>
                   </GetPlayerCount>"#,
            ))
            .unwrap();

        assert_eq!(normalized.global_players, vec!["Alpha", "Bravo", "Charlie"]);
        assert_eq!(normalized.rooms.len(), 2);

        let race = &normalized.rooms[0];
        assert_eq!(race.name, "Ice Race");
        assert_eq!(race.reported_count, 3);
        assert_eq!(race.players, vec!["Alpha", "Bravo", "Alpha"]);

        let unnamed = &normalized.rooms[1];
        assert_eq!(unnamed.name, UNKNOWN_LOBBY);
        assert_eq!(unnamed.max_players, 6);
        assert!(unnamed.players.is_empty());
    }

    #[test]
    fn test_attribute_precedence_over_children() {
        let player = Element::parse(
            r#"<Player accountName="FromAttr"><AccountName>FromChild</AccountName></Player>"#,
        )
        .unwrap();
        assert_eq!(player_name(&player), Some("FromAttr"));
    }

    #[test]
    fn test_zero_total_entries_ignores_lobbies() {
        let normalized = adapter()
            .normalize(payload(
                r#"<GetLobbyListing totalEntries="0"><Lobby GameName="Ghost"/></GetLobbyListing>"#,
                "<GetPlayerCount/>",
            ))
            .unwrap();
        assert!(normalized.rooms.is_empty());
        assert!(normalized.global_players.is_empty());
    }

    #[test]
    fn test_unexpected_root_is_malformed() {
        let result = adapter().normalize(payload("<Error>down</Error>", "<GetPlayerCount/>"));
        assert!(matches!(result, Err(AdapterError::MalformedPayload { .. })));
    }
}
