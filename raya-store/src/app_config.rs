use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub drafter: DrafterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Directory holding the profile's collection files.
    pub data_dir: String,
    /// Artificial latency applied to every store operation, for UX parity
    /// with a remote backend. Zero disables it.
    #[serde(default)]
    pub simulated_latency_ms: u64,
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DrafterConfig {
    /// Text-generation endpoint; unset means fallback-only drafting.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Caller-side bound on the drafting call before the fallback applies.
    #[serde(default = "default_drafter_timeout")]
    pub timeout_seconds: u64,
}

fn default_bus_capacity() -> usize {
    100
}

fn default_drafter_timeout() -> u64 {
    8
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides; the file is optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `RAYA_STORE__DATA_DIR=/tmp/raya` overrides `store.data_dir`
            .add_source(config::Environment::with_prefix("RAYA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
