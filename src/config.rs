use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const PRIMARY_URL: &str = "https://spaceflightnow.com/launch-schedule/";
pub const SECONDARY_URL: &str = "https://www.space.com/launch-calendar";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Source URLs and fetch settings. Every field can be overridden from the
/// environment, e.g. `LAUNCHES_TIMEOUT_SECS=5`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub primary_url: String,
    pub secondary_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_url: PRIMARY_URL.to_string(),
            secondary_url: SECONDARY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("LAUNCHES"))
    }

    fn from_env(env: Environment) -> Result<Self> {
        let defaults = Settings::default();
        Config::builder()
            .set_default("primary_url", defaults.primary_url)?
            .set_default("secondary_url", defaults.secondary_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("accept", defaults.accept)?
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid launch scraper settings")
    }
}
