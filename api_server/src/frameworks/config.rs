use std::{env, fs, path::PathBuf, time::Duration};
use thiserror::Error;
use url::Url;

use crate::domain::{Settings, SettingsPatch};
use crate::use_cases::admin::AdminCredentials;
use crate::use_cases::webinar_info::MAX_SEATS_LEFT;

// Runtime/server constants (not business settings).

pub const SHEETS_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const FAILED_LOGIN_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_API_BASE_URL: &str = "http://localhost:5678/webhook";
const DEV_JWT_SECRET: &str = "dev-only-jwt-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in production")]
    MissingJwtSecret,
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
    #[error("failed to read settings defaults from {path}: {source}")]
    DefaultsFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("settings defaults are not valid TOML: {0}")]
    DefaultsFormat(#[from] toml::de::Error),
    #[error("seats_total must be at least {min}, got {value}")]
    SeatsTotalTooSmall { value: u32, min: u32 },
}

pub fn http_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5000)
}

pub fn environment() -> String {
    env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string())
}

pub fn webhook_timeout() -> Duration {
    let millis = env::var("WEBHOOK_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

pub fn frontend_url() -> Option<String> {
    non_empty_var("FRONTEND_URL")
}

pub fn admin_credentials() -> AdminCredentials {
    AdminCredentials {
        username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
        password: env::var("ADMIN_PASSWORD").unwrap_or_default(),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn url_var(name: &'static str) -> Result<Option<Url>, ConfigError> {
    non_empty_var(name)
        .map(|value| Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { name, source }))
        .transpose()
}

// A missing secret is fatal in production; elsewhere a fixed dev secret keeps local runs simple.
pub fn resolve_jwt_secret(value: Option<String>, production: bool) -> Result<String, ConfigError> {
    match value.filter(|secret| !secret.trim().is_empty()) {
        Some(secret) => Ok(secret),
        None if production => Err(ConfigError::MissingJwtSecret),
        None => {
            tracing::warn!("JWT_SECRET not set; using the development secret");
            Ok(DEV_JWT_SECRET.to_string())
        }
    }
}

pub fn parse_settings_defaults(text: &str) -> Result<Settings, ConfigError> {
    let patch: SettingsPatch = toml::from_str(text)?;
    let settings = Settings::default().merged(patch);
    if settings.seats_total < MAX_SEATS_LEFT {
        return Err(ConfigError::SeatsTotalTooSmall {
            value: settings.seats_total,
            min: MAX_SEATS_LEFT,
        });
    }
    Ok(settings)
}

fn load_default_settings() -> Result<Settings, ConfigError> {
    let Some(path) = non_empty_var("SETTINGS_DEFAULTS_PATH").map(PathBuf::from) else {
        return Ok(Settings::default());
    };
    let text = fs::read_to_string(&path)
        .map_err(|source| ConfigError::DefaultsFile { path: path.clone(), source })?;
    let settings = parse_settings_defaults(&text)?;
    tracing::info!(path = %path.display(), "loaded settings defaults");
    Ok(settings)
}

/// Everything the server needs from the environment, read once at startup.
#[derive(Clone)]
pub struct ServerConfig {
    pub environment: String,
    pub api_base_url: Url,
    pub get_settings_webhook: Option<Url>,
    pub update_settings_webhook: Option<Url>,
    pub webhook_timeout: Duration,
    pub sheets_csv_url: Option<Url>,
    pub frontend_url: Option<String>,
    pub jwt_secret: String,
    pub admin: AdminCredentials,
    pub default_settings: Settings,
    pub failed_login_delay: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = environment();
        let production = environment == "production";
        let api_base_url = match url_var("API_BASE_URL")? {
            Some(url) => url,
            None => Url::parse(DEFAULT_API_BASE_URL).map_err(|source| {
                ConfigError::InvalidUrl {
                    name: "API_BASE_URL",
                    source,
                }
            })?,
        };

        Ok(Self {
            api_base_url,
            get_settings_webhook: url_var("N8N_GET_SETTINGS_WEBHOOK")?,
            update_settings_webhook: url_var("N8N_UPDATE_SETTINGS_WEBHOOK")?,
            webhook_timeout: webhook_timeout(),
            sheets_csv_url: url_var("SHEETS_CSV_URL")?,
            frontend_url: frontend_url(),
            jwt_secret: resolve_jwt_secret(env::var("JWT_SECRET").ok(), production)?,
            admin: admin_credentials(),
            default_settings: load_default_settings()?,
            failed_login_delay: FAILED_LOGIN_DELAY,
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_secret_is_missing_in_production_then_config_fails() {
        let result = resolve_jwt_secret(None, true);

        assert!(matches!(result, Err(ConfigError::MissingJwtSecret)));
    }

    #[test]
    fn when_secret_is_missing_in_development_then_dev_secret_is_used() {
        let secret = resolve_jwt_secret(Some("  ".to_string()), false).unwrap();

        assert_eq!(secret, DEV_JWT_SECRET);
    }

    #[test]
    fn when_secret_is_set_then_it_is_used() {
        let secret = resolve_jwt_secret(Some("prod-secret".to_string()), true).unwrap();

        assert_eq!(secret, "prod-secret");
    }

    #[test]
    fn when_defaults_file_sets_some_fields_then_others_keep_builtin_values() {
        let settings = parse_settings_defaults(
            r#"
            price = 799.0
            seats_total = 60
            contact_email = "hello@example.com"
            "#,
        )
        .unwrap();

        assert_eq!(settings.price, 799.0);
        assert_eq!(settings.seats_total, 60);
        assert_eq!(settings.contact_email, "hello@example.com");
        assert_eq!(settings.currency, "INR");
    }

    #[test]
    fn when_defaults_file_has_wrong_types_then_it_is_rejected() {
        let result = parse_settings_defaults("price = \"free\"");

        assert!(matches!(result, Err(ConfigError::DefaultsFormat(_))));
    }

    #[test]
    fn when_defaults_file_sets_too_few_seats_then_it_is_rejected() {
        let result = parse_settings_defaults("seats_total = 5");

        assert!(matches!(
            result,
            Err(ConfigError::SeatsTotalTooSmall { value: 5, min: 49 })
        ));
    }
}
