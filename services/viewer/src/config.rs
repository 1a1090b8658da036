//! Viewer configuration.
//!
//! Everything the original deployment hard-coded is explicit here: the
//! wind-data endpoint, the retry policy, the base-map tile source, and the
//! velocity style bundle. Values load from a YAML file with per-field
//! defaults, and the CLI may override the common ones.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wind_common::VelocityStyle;

/// Root viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Wind-data endpoint serving the [U, V] JSON payload
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Total fetch attempts, first try included
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Fixed delay between attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub style: VelocityStyle,
}

fn default_endpoint() -> String {
    "http://localhost:8080/data/wind".to_string()
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            map: MapConfig::default(),
            style: VelocityStyle::default(),
        }
    }
}

impl ViewerConfig {
    /// Load a viewer configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ViewerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), endpoint = %config.endpoint, "Loaded viewer config");
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            anyhow::bail!("endpoint must not be empty");
        }
        if self.retry_count == 0 {
            anyhow::bail!("retry_count must be at least 1");
        }
        self.style
            .validate()
            .context("style configuration is invalid")?;
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Base-map tile source and initial view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Tile-URL template; `{accessToken}` is substituted before use
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    /// Access credential for the tile provider
    #[serde(default)]
    pub access_token: String,

    #[serde(default = "default_attribution")]
    pub attribution: String,

    #[serde(default)]
    pub min_zoom: u8,

    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,

    #[serde(default = "default_tile_size")]
    pub tile_size: u32,

    /// Initial view center, latitude then longitude
    #[serde(default = "default_center")]
    pub center: [f64; 2],

    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_tile_url() -> String {
    "https://api.mapbox.com/styles/v1/mapbox/dark-v10/tiles/{z}/{x}/{y}?access_token={accessToken}"
        .to_string()
}

fn default_attribution() -> String {
    "© Mapbox © OpenStreetMap".to_string()
}

fn default_max_zoom() -> u8 {
    18
}

fn default_tile_size() -> u32 {
    512
}

fn default_center() -> [f64; 2] {
    [37.5, -98.0]
}

fn default_zoom() -> u8 {
    4
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: default_tile_url(),
            access_token: String::new(),
            attribution: default_attribution(),
            min_zoom: 0,
            max_zoom: default_max_zoom(),
            tile_size: default_tile_size(),
            center: default_center(),
            zoom: default_zoom(),
        }
    }
}

impl MapConfig {
    /// Tile URL with the access credential substituted in.
    pub fn resolved_tile_url(&self) -> String {
        self.tile_url.replace("{accessToken}", &self.access_token)
    }
}
