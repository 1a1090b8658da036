//! Wind flow viewer.
//!
//! Renders a base map and a particle flow layer from a two-component wind
//! field served by a local endpoint. The pipeline runs exactly once per
//! invocation: fetch with bounded retry, validate the payload, tag the
//! components, and attach the velocity layer.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use wind_common::VelocityStyle;
use wind_viewer::config::ViewerConfig;
use wind_viewer::fetch::{FetchConfig, WindFetcher};
use wind_viewer::layer::{MapSurface, ParticleFlowRenderer};
use wind_viewer::notify::LogAlert;
use wind_viewer::present;

#[derive(Parser, Debug)]
#[command(name = "wind-viewer")]
#[command(about = "Wind flow viewer: fetch, validate, and render the wind field")]
struct Args {
    /// Viewer configuration file (YAML)
    #[arg(short, long, env = "VIEWER_CONFIG")]
    config: Option<PathBuf>,

    /// Wind-data endpoint override
    #[arg(long, env = "WIND_ENDPOINT")]
    endpoint: Option<String>,

    /// Total fetch attempts, first try included
    #[arg(long)]
    retry_count: Option<u32>,

    /// Delay between fetch attempts in milliseconds
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Velocity style bundle (JSON file)
    #[arg(long)]
    style: Option<PathBuf>,

    /// Tile-provider access token
    #[arg(long, env = "MAP_ACCESS_TOKEN")]
    access_token: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Resolve the effective configuration: file (or defaults), then CLI
    /// overrides on top.
    fn into_config(self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(retry_count) = self.retry_count {
            config.retry_count = retry_count;
        }
        if let Some(retry_delay_ms) = self.retry_delay_ms {
            config.retry_delay_ms = retry_delay_ms;
        }
        if let Some(request_timeout_secs) = self.request_timeout_secs {
            config.request_timeout_secs = request_timeout_secs;
        }
        if let Some(style_path) = self.style {
            config.style = VelocityStyle::from_file(&style_path)?;
        }
        if let Some(access_token) = self.access_token {
            config.map.access_token = access_token;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.into_config()?;

    info!(
        endpoint = %config.endpoint,
        retry_count = config.retry_count,
        retry_delay_ms = config.retry_delay_ms,
        "Starting wind viewer"
    );

    let mut surface = MapSurface::new(&config.map);

    let fetcher = WindFetcher::new(FetchConfig {
        endpoint: config.endpoint.clone(),
        max_attempts: config.retry_count,
        retry_delay: config.retry_delay(),
        request_timeout: config.request_timeout(),
    })?;

    let renderer = ParticleFlowRenderer;
    let alerts = LogAlert;

    if let Err(err) =
        present::load_wind_data(&fetcher, &renderer, &mut surface, &config.style, &alerts).await
    {
        // Every failure path has already been logged and alerted.
        debug!(error = %err, "Pipeline aborted");
        std::process::exit(1);
    }

    info!("Wind viewer ready");
    Ok(())
}
