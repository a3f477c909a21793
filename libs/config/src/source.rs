//! Static configuration for one upstream source

use serde::{Deserialize, Serialize};
use std::time::Duration;
use types::{
    MismatchPolicy, NamePolicy, NameRule, ReconcilePolicy, RosterAssignment, SourceKind,
    TotalPolicy, UnenumeratedPolicy,
};

use crate::titles::{apocalypse, arctic_edge, monument_valley, pacific_rift, polling};

/// Fixed-delay retry budget for one source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Delay between attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: polling::MAX_RETRIES,
            delay_ms: polling::RETRY_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Delay between attempts
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Total attempts including the first one
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Everything the pipeline needs to know about one upstream title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Stable identifier, also used as the snapshot's `source`
    pub id: String,

    /// Name of the synthetic general lobby
    pub display_name: String,

    /// Upstream API shape
    pub kind: SourceKind,

    /// Endpoint root; adapters append their own paths
    pub base_url: String,

    /// Upstream application id used to filter listings
    pub app_id: String,

    /// Capacity used when upstream omits a room's maximum
    pub max_players_default: u32,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Player-name dialect
    #[serde(default)]
    pub names: NamePolicy,

    /// Room names are cut at the first occurrence of this delimiter
    #[serde(default)]
    pub room_name_delimiter: Option<String>,

    #[serde(default)]
    pub reconcile: ReconcilePolicy,

    #[serde(default)]
    pub total: TotalPolicy,

    /// Also query the universe endpoint for its name and player count
    #[serde(default)]
    pub fetch_universe: bool,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    /// MotorStorm Arctic Edge (Medius XML)
    pub fn arctic_edge() -> Self {
        Self {
            id: arctic_edge::ID.to_string(),
            display_name: arctic_edge::DISPLAY_NAME.to_string(),
            kind: SourceKind::MediusXml,
            base_url: arctic_edge::BASE_URL.to_string(),
            app_id: arctic_edge::APP_ID.to_string(),
            max_players_default: arctic_edge::MAX_PLAYERS,
            enabled: true,
            retry: RetryConfig::default(),
            names: NamePolicy::new(vec![NameRule::TruncateAtWhitespace]),
            room_name_delimiter: Some(arctic_edge::ROOM_NAME_DELIMITER.to_string()),
            reconcile: ReconcilePolicy {
                mismatch: MismatchPolicy::TrustCount,
                unenumerated: UnenumeratedPolicy::Joining,
                assignment: RosterAssignment::Shared,
            },
            total: TotalPolicy::DistinctRoster,
            fetch_universe: false,
        }
    }

    /// MotorStorm Monument Valley (Rewired JSON)
    pub fn monument_valley() -> Self {
        Self {
            id: monument_valley::ID.to_string(),
            display_name: monument_valley::DISPLAY_NAME.to_string(),
            kind: SourceKind::RewiredJson,
            base_url: monument_valley::BASE_URL.to_string(),
            app_id: monument_valley::APP_ID.to_string(),
            max_players_default: monument_valley::MAX_PLAYERS,
            enabled: true,
            retry: RetryConfig::default(),
            names: NamePolicy::new(vec![NameRule::StripHexDashPrefix]),
            room_name_delimiter: None,
            reconcile: ReconcilePolicy {
                mismatch: MismatchPolicy::TrustCount,
                unenumerated: UnenumeratedPolicy::Empty,
                assignment: RosterAssignment::Exclusive,
            },
            total: TotalPolicy::SumReportedCounts,
            fetch_universe: true,
        }
    }

    /// MotorStorm Pacific Rift (Rewired JSON)
    pub fn pacific_rift() -> Self {
        Self {
            id: pacific_rift::ID.to_string(),
            display_name: pacific_rift::DISPLAY_NAME.to_string(),
            kind: SourceKind::RewiredJson,
            base_url: pacific_rift::BASE_URL.to_string(),
            app_id: pacific_rift::APP_ID.to_string(),
            max_players_default: pacific_rift::MAX_PLAYERS,
            enabled: true,
            retry: RetryConfig::default(),
            names: NamePolicy::new(vec![NameRule::StripHexDashPrefix, NameRule::StripHexPrefix]),
            room_name_delimiter: None,
            reconcile: ReconcilePolicy {
                mismatch: MismatchPolicy::TrustList,
                unenumerated: UnenumeratedPolicy::Joining,
                assignment: RosterAssignment::Exclusive,
            },
            total: TotalPolicy::SumReportedCounts,
            fetch_universe: false,
        }
    }

    /// MotorStorm Apocalypse (PSORG room dump)
    pub fn apocalypse() -> Self {
        Self {
            id: apocalypse::ID.to_string(),
            display_name: apocalypse::DISPLAY_NAME.to_string(),
            kind: SourceKind::PsorgRooms,
            base_url: apocalypse::BASE_URL.to_string(),
            app_id: apocalypse::APP_ID.to_string(),
            max_players_default: apocalypse::MAX_PLAYERS,
            enabled: true,
            retry: RetryConfig {
                max_retries: polling::MAX_RETRIES,
                delay_ms: apocalypse::RETRY_DELAY_MS,
            },
            names: NamePolicy::new(vec![NameRule::StripHexDashPrefix]),
            room_name_delimiter: None,
            reconcile: ReconcilePolicy {
                mismatch: MismatchPolicy::TrustList,
                unenumerated: UnenumeratedPolicy::Joining,
                assignment: RosterAssignment::Shared,
            },
            total: TotalPolicy::DistinctRoster,
            fetch_universe: false,
        }
    }

    /// Every built-in title preset
    pub fn presets() -> Vec<Self> {
        vec![
            Self::arctic_edge(),
            Self::monument_valley(),
            Self::pacific_rift(),
            Self::apocalypse(),
        ]
    }

    /// Point this source at a different endpoint root (mirrors, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the retry budget
    pub fn with_retry(mut self, max_retries: u32, delay: Duration) -> Self {
        self.retry = RetryConfig {
            max_retries,
            delay_ms: delay.as_millis() as u64,
        };
        self
    }

    /// Cut a raw room name at the configured delimiter
    pub fn trim_room_name<'a>(&self, raw: &'a str) -> &'a str {
        let name = match self.room_name_delimiter.as_deref() {
            Some(delimiter) if !delimiter.is_empty() => {
                raw.split(delimiter).next().unwrap_or(raw)
            }
            _ => raw,
        };
        name.trim()
    }

    /// Join `path` onto the endpoint root
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
