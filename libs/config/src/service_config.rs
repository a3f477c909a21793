//! Poller Configuration Module
//!
//! Loads the list of polled sources from a TOML file with `STATUS_`-prefixed
//! environment overrides, or falls back to the built-in title presets.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::source::SourceConfig;
use crate::titles::polling;

/// Environment variable prefix for overrides (`STATUS_POLL_INTERVAL_MS=5000`)
pub const ENV_PREFIX: &str = "STATUS";

/// Top-level poller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Interval between poll cycles in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Sources in polling order
    pub sources: Vec<SourceConfig>,
}

fn default_poll_interval_ms() -> u64 {
    polling::POLL_INTERVAL_MS
}

fn default_request_timeout_ms() -> u64 {
    polling::REQUEST_TIMEOUT_MS
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: polling::POLL_INTERVAL_MS,
            request_timeout_ms: polling::REQUEST_TIMEOUT_MS,
            sources: SourceConfig::presets(),
        }
    }
}

impl PollerConfig {
    /// Load configuration from a TOML file with environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading poller config: {:?}", path);

        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(env_overrides())
            .build()
            .with_context(|| format!("Failed to build configuration from {:?}", path))?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Built-in presets with scalar environment overrides applied
    pub fn from_env() -> Result<Self> {
        let overrides = Config::builder()
            .add_source(env_overrides())
            .build()
            .context("Failed to read environment overrides")?;

        let mut config = Self::default();
        if let Ok(interval) = overrides.get::<u64>("poll_interval_ms") {
            config.poll_interval_ms = interval;
        }
        if let Ok(timeout) = overrides.get::<u64>("request_timeout_ms") {
            config.request_timeout_ms = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    /// Interval between poll cycles
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-request HTTP timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Enabled sources, optionally restricted to the given ids
    pub fn active_sources(&self, only: &[String]) -> Vec<SourceConfig> {
        self.sources
            .iter()
            .filter(|source| source.enabled)
            .filter(|source| only.is_empty() || only.iter().any(|id| id == &source.id))
            .cloned()
            .collect()
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than 0");
        }

        if self.request_timeout_ms == 0 {
            bail!("request_timeout_ms must be greater than 0");
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.id.trim().is_empty() {
                bail!("source id cannot be empty");
            }

            if !seen.insert(source.id.as_str()) {
                bail!("duplicate source id: {}", source.id);
            }

            let url = url::Url::parse(&source.base_url)
                .with_context(|| format!("invalid base_url for {}: {}", source.id, source.base_url))?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("base_url for {} must use http or https", source.id);
            }

            if source.max_players_default == 0 {
                bail!("max_players_default for {} must be greater than 0", source.id);
            }

            if let Some(delimiter) = &source.room_name_delimiter {
                if delimiter.trim().is_empty() {
                    bail!("room_name_delimiter for {} cannot be blank", source.id);
                }
            }

            debug!("Validated source {} ({})", source.id, source.kind);
        }

        Ok(())
    }
}

fn env_overrides() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
