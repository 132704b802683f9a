use std::path::PathBuf;

/// Runtime configuration, assembled from environment variables by
/// [`crate::config::load_app_config`]. Every field has a default, so a
/// bare environment is a valid one.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Path to the YAML store registry.
    pub stores_path: PathBuf,
    /// Per-request timeout for page fetches and asset downloads.
    pub request_timeout_secs: u64,
    /// Fixed identifying User-Agent sent on every request.
    pub user_agent: String,
    /// Additional attempts after the first failed page fetch.
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff: `base * 2^attempt`.
    pub retry_backoff_base_secs: u64,
    /// Ranked candidates tried per store before giving up.
    pub max_candidate_attempts: usize,
    /// Largest downloadable asset, in bytes.
    pub max_asset_bytes: u64,
}
