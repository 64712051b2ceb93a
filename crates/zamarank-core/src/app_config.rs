use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Root of the upstream API, e.g. `https://zamarank.live/api`.
    pub api_base_url: String,
    /// Upper bound on leaderboard pages scanned per timeframe.
    pub max_pages: u32,
    /// `None` leaves upstream requests without a timeout.
    pub http_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub card_background_path: Option<PathBuf>,
    pub keepalive_url: Option<String>,
    pub keepalive_interval_secs: u64,
}
