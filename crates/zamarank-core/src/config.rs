use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://zamarank.live/api";
pub const DEFAULT_MAX_PAGES: u32 = 15;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{Ipv4Addr, SocketAddr};
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        match or_default(var, default).trim().parse::<u32>() {
            Ok(0) => Err(invalid(var, "must be at least 1".to_string())),
            Ok(v) => Ok(v),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let parse_positive_u64 = |var: &str, raw: &str| -> Result<u64, ConfigError> {
        match raw.trim().parse::<u64>() {
            Ok(0) => Err(invalid(var, "must be at least 1".to_string())),
            Ok(v) => Ok(v),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let env = parse_environment(&or_default("ZAMARANK_ENV", "development"))
        .ok_or_else(|| invalid("ZAMARANK_ENV", "expected development, test, or production".to_string()))?;

    let port = parse_u16("PORT", "3000")?;
    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let log_level = or_default("ZAMARANK_LOG_LEVEL", "info");

    let api_base_url = or_default("ZAMARANK_API_BASE_URL", DEFAULT_API_BASE_URL);
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "ZAMARANK_API_BASE_URL",
            format!("expected an http(s) URL, got '{api_base_url}'"),
        ));
    }

    let max_pages = parse_positive_u32("ZAMARANK_MAX_PAGES", &DEFAULT_MAX_PAGES.to_string())?;
    let http_timeout_secs = optional("ZAMARANK_HTTP_TIMEOUT_SECS")
        .map(|raw| parse_positive_u64("ZAMARANK_HTTP_TIMEOUT_SECS", &raw))
        .transpose()?;
    let user_agent = or_default("ZAMARANK_USER_AGENT", "zamarank-helper/0.1");
    let card_background_path = optional("ZAMARANK_CARD_BACKGROUND").map(PathBuf::from);

    let keepalive_url = optional("ZAMARANK_KEEPALIVE_URL");
    let keepalive_interval_secs = parse_positive_u64(
        "ZAMARANK_KEEPALIVE_INTERVAL_SECS",
        &or_default("ZAMARANK_KEEPALIVE_INTERVAL_SECS", "600"),
    )?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_base_url,
        max_pages,
        http_timeout_secs,
        user_agent,
        card_background_path,
        keepalive_url,
        keepalive_interval_secs,
    })
}

/// Parse a string into an `Environment` variant. Unknown values yield `None`.
fn parse_environment(s: &str) -> Option<Environment> {
    match s.trim() {
        "development" => Some(Environment::Development),
        "test" => Some(Environment::Test),
        "production" => Some(Environment::Production),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
