//! Shared fixtures for the mock-server integration tests

#![allow(dead_code)]

use adapter_service::HttpFetcher;
use mockito::{Matcher, Mock, ServerGuard};
use status_config::SourceConfig;
use std::time::Duration;

pub const RETRY_DELAY: Duration = Duration::from_millis(10);

pub fn http() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5)).unwrap()
}

/// Point a preset at the mock server with a fast retry budget
pub fn against(source: SourceConfig, server: &ServerGuard) -> SourceConfig {
    source
        .with_base_url(server.url())
        .with_retry(3, RETRY_DELAY)
}

/// JSON endpoint filtered by a single query parameter
pub async fn json_query(
    server: &mut ServerGuard,
    path: &str,
    key: &str,
    value: &str,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded(key.into(), value.into()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// JSON endpoint without a query string
pub async fn json_path(server: &mut ServerGuard, path: &str, status: usize, body: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub const MEDIUS_LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<GetLobbyListing totalEntries="2">
  <Lobby GameName="Glacier Run~9f1c" PlayerCount="3" MaxPlayers="6" PlayerListCurrent="IceMan PS3,Frosty PSP"/>
  <Lobby GameName="Quiet~aa01" PlayerCount="0" PlayerListCurrent=""/>
</GetLobbyListing>"#;

pub const MEDIUS_PLAYERS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<GetPlayerCount>
  <Player AccountName="IceMan PS3"/>
  <Player AccountName="Frosty PSP"/>
  <Player AccountName="IceMan PS3"/>
  <Player><Account><Name>Lurker</Name></Account></Player>
</GetPlayerCount>"#;

pub const MV_ROOMS: &str = r#"[
  {"id": 101, "name": "Canyon", "playerCount": 2, "maxPlayers": 12},
  {"id": 102, "name": "Mesa", "playerCount": 1}
]"#;

pub const MV_PLAYERS: &str = r#"[
  {"name": "0000a1b2-Dusty"},
  {"name": "0000a1b2-Rider"},
  {"name": "Solo"}
]"#;

pub const MV_UNIVERSE: &str = r#"[{"name": "MotorStorm NTSC", "playerCount": 3}]"#;

pub const MV_DETAIL_101: &str = r#"[
  {"name": "Canyon Race", "players": [{"name": "0000a1b2-Dusty"}]},
  {"players": [{"name": "0000a1b2-Rider"}]}
]"#;

pub const MV_DETAIL_102: &str = r#"{"name": "Mesa", "players": []}"#;

pub const PR_ROOMS: &str = r#"[
  {"id": "r1", "name": "Volcano", "playerCount": 3, "maxPlayers": 12},
  {"id": "r2", "name": "Jungle", "playerCount": 1}
]"#;

pub const PR_PLAYERS: &str = r#"[{"name": "1a2b3c4d-Blaze"}, {"name": "deadbeefKai"}]"#;

pub const PR_DETAIL_R1: &str =
    r#"{"name": "Volcano", "players": [{"name": "1a2b3c4d-Blaze"}, {"name": "deadbeefKai"}]}"#;

pub const PSORG_ROOMS: &str = r#"[
  {"AppId": 20371, "Worlds": []},
  {"AppId": 22500, "Worlds": [
    {"WorldId": 3, "GameSessions": [
      {"Name": "fffff7fb-Harbour Chase", "Clients": [
        {"Name": "fffff7fb-ZoniBoy0"},
        {"PlayerName": "0000016f-Wrecker"}
      ]},
      {"Clients": []}
    ]}
  ]}
]"#;
