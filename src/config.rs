use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL for the document store
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Base URL of the context-aware recommendation API
    #[serde(default = "default_context_api_url")]
    pub context_api_url: String,

    /// Base URL of the external authentication service
    #[serde(default = "default_auth_api_url")]
    pub auth_api_url: String,

    /// Path to the PEM-encoded RSA private key used to decrypt request bodies
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,

    /// Seconds between runs of the expiry sweepers
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_context_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_auth_api_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_private_key_path() -> String {
    "private-key.pem".to_string()
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
