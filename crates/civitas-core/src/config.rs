use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://api-adresse.data.gouv.fr/search/";
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "civitas/0.1 (address-suggestions)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
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
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("CIVITAS_ENV", "development"))?;

    let bind_addr = or_default("CIVITAS_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CIVITAS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("CIVITAS_LOG_LEVEL", "info");
    let communes_path = PathBuf::from(or_default(
        "CIVITAS_COMMUNES_PATH",
        "./config/communes.yaml",
    ));

    let geocoder_base_url = or_default("CIVITAS_GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL);
    if !(geocoder_base_url.starts_with("http://") || geocoder_base_url.starts_with("https://")) {
        return Err(invalid(
            "CIVITAS_GEOCODER_BASE_URL",
            format!("'{geocoder_base_url}' is not an http(s) URL"),
        ));
    }
    let geocoder_user_agent = or_default("CIVITAS_GEOCODER_USER_AGENT", DEFAULT_GEOCODER_USER_AGENT);

    let geocoder_timeout_secs = or_default("CIVITAS_GEOCODER_TIMEOUT_SECS", "10")
        .parse::<u64>()
        .map_err(|e| invalid("CIVITAS_GEOCODER_TIMEOUT_SECS", e.to_string()))?;
    if geocoder_timeout_secs == 0 {
        return Err(invalid(
            "CIVITAS_GEOCODER_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let rate_limit_per_minute = or_default("CIVITAS_RATE_LIMIT_PER_MINUTE", "120")
        .parse::<usize>()
        .map_err(|e| invalid("CIVITAS_RATE_LIMIT_PER_MINUTE", e.to_string()))?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "CIVITAS_RATE_LIMIT_PER_MINUTE",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        communes_path,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CIVITAS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
