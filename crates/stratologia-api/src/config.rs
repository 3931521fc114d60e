//! Runtime configuration resolved from environment variables.
//!
//! Values are read through a lookup function so tests can supply a map
//! instead of mutating the process environment.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use stratologia_mailer::{DEFAULT_FROM, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, MailerConfig};
use thiserror::Error;

/// Origins allowed when neither `ALLOW_ORIGINS_RAW` nor `ALLOW_ORIGINS` yields any.
pub const DEFAULT_ALLOW_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Errors raised while loading [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    /// A variable is set but not well-formed.
    #[error("{key} is invalid: {reason}")]
    Invalid {
        /// The offending variable.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Origins permitted to make cross-origin requests.
    pub allow_origins: Vec<String>,
    /// Outbound mail relay.
    pub mailer: MailerConfig,
    /// OTLP collector endpoint; trace export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings from an arbitrary key lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is
    /// malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse_port("PORT", get("PORT"), DEFAULT_PORT)?;
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e| ConfigError::Invalid {
                    key: "HOST",
                    reason: format!("invalid HOST:PORT combination: {e}"),
                })?;

        let allow_origins = resolve_origins(
            get("ALLOW_ORIGINS_RAW").as_deref(),
            get("ALLOW_ORIGINS").as_deref(),
        );
        validate_origins(&allow_origins)?;

        let smtp_host = get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned());
        let smtp_port = parse_port("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?;
        let smtp_from = get("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM.to_owned());
        let mailer =
            MailerConfig::new(smtp_host, smtp_port, &smtp_from).map_err(|e| ConfigError::Invalid {
                key: "SMTP_FROM",
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url,
            bind_addr,
            allow_origins,
            mailer,
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn parse_port(key: &'static str, raw: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("must be a valid u16: {e}"),
        }),
    }
}

/// Parses an origin list given either as a JSON array of strings or as a
/// comma-separated string. Blank entries are dropped.
#[must_use]
pub fn parse_origins(raw: &str) -> Vec<String> {
    let entries: Vec<String> = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(_) => raw.split(',').map(str::to_owned).collect(),
    };
    entries
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

/// `ALLOW_ORIGINS_RAW` wins when it yields at least one origin, then
/// `ALLOW_ORIGINS`, then [`DEFAULT_ALLOW_ORIGINS`].
fn resolve_origins(raw: Option<&str>, list: Option<&str>) -> Vec<String> {
    [raw, list]
        .into_iter()
        .flatten()
        .map(parse_origins)
        .find(|origins| !origins.is_empty())
        .unwrap_or_else(|| {
            DEFAULT_ALLOW_ORIGINS
                .iter()
                .map(|origin| (*origin).to_owned())
                .collect()
        })
}

fn validate_origins(origins: &[String]) -> Result<(), ConfigError> {
    for origin in origins {
        if origin == "*" {
            return Err(ConfigError::Invalid {
                key: "ALLOW_ORIGINS",
                reason: "wildcard origin cannot be combined with credentials".to_owned(),
            });
        }
        HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
            key: "ALLOW_ORIGINS",
            reason: format!("{origin:?}: {e}"),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    const DB: (&str, &str) = ("DATABASE_URL", "postgres://stratou:secret@db:5432/stratologia");

    #[test]
    fn test_loads_defaults() {
        let settings = settings_from(&[DB]).unwrap();

        assert_eq!(settings.bind_addr.to_string(), "0.0.0.0:8000");
        assert_eq!(
            settings.allow_origins,
            vec!["http://localhost:5173", "http://localhost:5174"]
        );
        assert_eq!(settings.mailer.host, "mailhog");
        assert_eq!(settings.mailer.port, 1025);
        assert_eq!(settings.mailer.from.to_string(), "noreply@stratologia.local");
        assert!(settings.otlp_endpoint.is_none());
    }

    #[test]
    fn test_missing_database_url_is_an_error() {
        let err = settings_from(&[]).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = settings_from(&[DB, ("PORT", "eighty")]).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn test_invalid_sender_is_an_error() {
        let err = settings_from(&[DB, ("SMTP_FROM", "nobody")]).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "SMTP_FROM", .. }));
    }

    #[test]
    fn test_raw_origins_take_precedence() {
        let settings = settings_from(&[
            DB,
            ("ALLOW_ORIGINS_RAW", "https://a.example, https://b.example"),
            ("ALLOW_ORIGINS", r#"["https://c.example"]"#),
        ])
        .unwrap();

        assert_eq!(
            settings.allow_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_falls_back_to_allow_origins_when_raw_is_empty() {
        let settings = settings_from(&[
            DB,
            ("ALLOW_ORIGINS_RAW", " , "),
            ("ALLOW_ORIGINS", r#"["https://c.example"]"#),
        ])
        .unwrap();

        assert_eq!(settings.allow_origins, vec!["https://c.example"]);
    }

    #[test]
    fn test_wildcard_origin_is_rejected() {
        let err = settings_from(&[DB, ("ALLOW_ORIGINS_RAW", "*")]).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "ALLOW_ORIGINS",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_origins_accepts_json_and_csv() {
        assert_eq!(
            parse_origins(r#"["http://x.test","http://y.test"]"#),
            vec!["http://x.test", "http://y.test"]
        );
        assert_eq!(
            parse_origins("http://x.test,,http://y.test "),
            vec!["http://x.test", "http://y.test"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_parse_origins_drops_blank_json_entries() {
        assert_eq!(
            parse_origins(r#"["", "  ", " http://x.test "]"#),
            vec!["http://x.test"]
        );
        assert!(parse_origins(r#"[""]"#).is_empty());
    }
}
