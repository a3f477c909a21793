//! Source adapters for each upstream API shape
//!
//! Every adapter performs its own call sequence in [`SourceAdapter::fetch`]
//! and turns the raw payload into a uniform [`NormalizedSource`] in
//! [`SourceAdapter::normalize`]. Player names leave an adapter already
//! canonicalized with the source's [`NamePolicy`](types::NamePolicy), with
//! unknown (empty) names dropped.

pub mod medius;
pub mod psorg;
pub mod rewired;

use async_trait::async_trait;
use serde_json::Value;
use status_config::SourceConfig;
use tokio_util::sync::CancellationToken;
use types::SourceKind;

use crate::error::{FetchError, Result};
use crate::fetcher::HttpFetcher;
use crate::xml::Element;

pub use medius::MediusAdapter;
pub use psorg::PsorgAdapter;
pub use rewired::RewiredAdapter;

/// Fallback for rooms upstream did not name
pub const UNKNOWN_LOBBY: &str = "Unknown Lobby";

/// Core trait for all source adapters
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Static configuration this adapter was built from
    fn source(&self) -> &SourceConfig;

    /// Perform the complete upstream call sequence once
    async fn fetch(
        &self,
        http: &HttpFetcher,
        cancel: &CancellationToken,
    ) -> std::result::Result<RawPayload, FetchError>;

    /// Convert a raw payload into rooms and a global roster
    fn normalize(&self, raw: RawPayload) -> Result<NormalizedSource>;
}

/// Unprocessed upstream responses, one variant per API shape
#[derive(Debug, Clone)]
pub enum RawPayload {
    /// Lobby listing and player list documents
    Medius { listing: Element, players: Element },
    /// Room listing, universe roster, optional universe and per-room detail
    Rewired {
        rooms: Value,
        players: Value,
        universe: Option<Value>,
        details: Vec<RoomDetail>,
    },
    /// Whole-service room dump
    Psorg { rooms: Value },
}

impl RawPayload {
    /// Short label for diagnostics
    pub fn kind(&self) -> SourceKind {
        match self {
            RawPayload::Medius { .. } => SourceKind::MediusXml,
            RawPayload::Rewired { .. } => SourceKind::RewiredJson,
            RawPayload::Psorg { .. } => SourceKind::PsorgRooms,
        }
    }
}

/// Outcome of one per-room detail call
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room_id: String,
    /// Detail body, or the reason the call failed
    pub body: std::result::Result<Value, String>,
}

/// One upstream room before reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRecord {
    pub id: Option<String>,
    pub name: String,
    /// Count exactly as upstream reported it
    pub reported_count: u32,
    pub max_players: u32,
    /// Normalized, non-empty names in upstream order (may repeat)
    pub players: Vec<String>,
}

/// Uniform adapter output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSource {
    /// Rooms in upstream listing order
    pub rooms: Vec<RoomRecord>,
    /// Every player the source reports, normalized, possibly repeating
    pub global_players: Vec<String>,
    /// Upstream-supplied name for the general lobby
    pub general_name: Option<String>,
    /// Upstream-supplied total for the general lobby
    pub reported_total: Option<u32>,
}

/// Build the adapter for a source's API shape
pub fn adapter_for(source: SourceConfig) -> Box<dyn SourceAdapter> {
    match source.kind {
        SourceKind::MediusXml => Box::new(MediusAdapter::new(source)),
        SourceKind::RewiredJson => Box::new(RewiredAdapter::new(source)),
        SourceKind::PsorgRooms => Box::new(PsorgAdapter::new(source)),
    }
}

/// Collapse the single-object-or-list irregularity into a list
pub fn one_or_many(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// First non-blank string among `keys`, in precedence order
pub fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(Value::as_str)
        .find(|candidate| !candidate.trim().is_empty())
}

/// Non-negative count from a number or a numeric string
pub fn as_count(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n.min(u32::MAX as u64) as u32),
        Value::String(text) => parse_count(text),
        _ => None,
    }
}

/// Leading-integer parse of a count attribute ("3", " 3 ", "3 players")
pub fn parse_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Identifier that may arrive as a string or a number
pub fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Tokens of a comma-separated inline list, blanks skipped
pub fn split_inline_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|token| !token.is_empty())
}
