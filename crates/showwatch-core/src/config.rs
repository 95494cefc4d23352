use crate::app_config::{AppConfig, ChannelKind, ChannelSettings, Environment};
use crate::report::ID_PLACEHOLDER;
use crate::ConfigError;

pub const DEFAULT_REPORT_SUBJECT: &str = "🎵 דיווח הופעות מעודכנות";
pub const DEFAULT_ARTISTS_PATH: &str = "./config/artists.yaml";
pub const DEFAULT_EVENT_URL_TEMPLATE: &str = "https://barby.co.il/event/{id}";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let env = parse_environment(&or_default("SHOWWATCH_ENV", "development"))?;
    let bind_addr = parse_addr("SHOWWATCH_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("SHOWWATCH_LOG_LEVEL", "info");
    let artists_path = PathBuf::from(or_default("SHOWWATCH_ARTISTS_PATH", DEFAULT_ARTISTS_PATH));

    let venue_url = or_default("SHOWWATCH_VENUE_URL", "https://barby.co.il");
    let listing_path = or_default("SHOWWATCH_LISTING_PATH", "/api/shows/find");
    let event_url_template = or_default("SHOWWATCH_EVENT_URL_TEMPLATE", DEFAULT_EVENT_URL_TEMPLATE);
    if !event_url_template.contains(ID_PLACEHOLDER) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOWWATCH_EVENT_URL_TEMPLATE".to_string(),
            reason: format!("template must contain {ID_PLACEHOLDER}"),
        });
    }
    let fetch_timeout_secs = parse_u64("SHOWWATCH_FETCH_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("SHOWWATCH_USER_AGENT", "showwatch/0.1");

    let kind = parse_channel_kind(&require("SHOWWATCH_CHANNEL")?)?;
    let destination = require("SHOWWATCH_CHANNEL_DESTINATION")?;
    let credentials_ref = optional("SHOWWATCH_CHANNEL_CREDENTIALS").map(PathBuf::from);
    if kind == ChannelKind::Mail && credentials_ref.is_none() {
        return Err(ConfigError::MissingEnvVar(
            "SHOWWATCH_CHANNEL_CREDENTIALS".to_string(),
        ));
    }
    let mail_api_url = or_default("SHOWWATCH_MAIL_API_URL", "https://gmail.googleapis.com");

    let report_subject = or_default("SHOWWATCH_REPORT_SUBJECT", DEFAULT_REPORT_SUBJECT);
    let schedule = or_default("SHOWWATCH_SCHEDULE", "0 0 * * * *");
    let seen_path = optional("SHOWWATCH_SEEN_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        artists_path,
        venue_url,
        listing_path,
        event_url_template,
        fetch_timeout_secs,
        user_agent,
        channel: ChannelSettings {
            kind,
            destination,
            credentials_ref,
            mail_api_url,
        },
        report_subject,
        schedule,
        seen_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOWWATCH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_channel_kind(s: &str) -> Result<ChannelKind, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "topic" => Ok(ChannelKind::Topic),
        "sns" => Ok(ChannelKind::Sns),
        "mail" => Ok(ChannelKind::Mail),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOWWATCH_CHANNEL".to_string(),
            reason: format!("expected 'topic', 'sns' or 'mail', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
