use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default identifying client string; overridable via `LOGOSCOUT_USER_AGENT`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Logoscout/0.1; +https://localhost)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing logic, decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("LOGOSCOUT_LOG_LEVEL", "info");
    let stores_path = PathBuf::from(or_default("LOGOSCOUT_STORES_PATH", "./config/stores.yaml"));
    let request_timeout_secs = parse_u64("LOGOSCOUT_REQUEST_TIMEOUT_SECS", "25")?;
    let user_agent = or_default("LOGOSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("LOGOSCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("LOGOSCOUT_RETRY_BACKOFF_BASE_SECS", "1")?;
    let max_candidate_attempts = parse_usize("LOGOSCOUT_MAX_CANDIDATE_ATTEMPTS", "80")?;
    let max_asset_bytes = parse_u64("LOGOSCOUT_MAX_ASSET_BYTES", "2000000")?;

    Ok(AppConfig {
        log_level,
        stores_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        max_candidate_attempts,
        max_asset_bytes,
    })
}
