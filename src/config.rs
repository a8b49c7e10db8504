use serde::Deserialize;
use std::time::Duration;

use crate::io::DEFAULT_BASE_URL;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub io: IoConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IoConfig {
    pub base_url: String,
    /// Service API token. Either of the two tokens issued on service
    /// registration works.
    pub token: Option<String>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Pause between two API requests, in milliseconds.
    pub sleep_ms: u64,
    /// Cap on rate-limit replays per call; absent means retry forever.
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            sleep_ms: 1000,
            max_rate_limit_retries: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("IOBOT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.reconcile.sleep_ms)
    }
}
