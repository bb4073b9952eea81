//! [`Config`]-related definitions.

use std::time::Duration;

use clap::ValueEnum;
use common::pagination::Limit;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use service::locale::{Language, Locale};
use smart_default::SmartDefault;
use time::UtcOffset;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Ticket backend configuration.
    pub backend: Backend,

    /// Dashboard configuration.
    pub dashboard: Dashboard,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Ticket backend configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Backend {
    /// Base URL of the ticket API.
    #[default("http://127.0.0.1:3000/api".to_owned())]
    pub url: String,

    /// Bearer token to authorize with.
    #[serde(deserialize_with = "secret")]
    pub token: Option<SecretString>,

    /// Timeout of a single request to the ticket API.
    #[default(Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl From<Backend> for service::infra::rest::Config {
    fn from(value: Backend) -> Self {
        let Backend {
            url,
            token,
            timeout,
        } = value;
        Self {
            url,
            token,
            timeout,
        }
    }
}

/// Deserializes an optional string into a [`SecretString`].
fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Dashboard configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Dashboard {
    /// Language of the labels.
    pub language: Lang,

    /// Offset from UTC, in whole hours, calendar days are counted at.
    #[default(3)]
    pub utc_offset_hours: i8,

    /// Number of requests per page a fresh list starts with.
    #[default(10)]
    pub default_limit: u32,
}

impl Dashboard {
    /// Returns the [`Locale`] of this [`Dashboard`].
    #[must_use]
    pub const fn locale(&self) -> Locale {
        Locale::new(match self.language {
            Lang::Tr => Language::Tr,
            Lang::En => Language::En,
        })
    }

    /// Converts this [`Dashboard`] into a [`service::list::Config`].
    ///
    /// # Errors
    ///
    /// If the UTC offset is out of range or the page size is not one of the
    /// allowed [`Limit`]s.
    pub fn list(&self) -> Result<service::list::Config, String> {
        Ok(service::list::Config {
            default_limit: Limit::try_from(self.default_limit)
                .map_err(|e| e.to_string())?,
            utc_offset: UtcOffset::from_hms(self.utc_offset_hours, 0, 0)
                .map_err(|e| e.to_string())?,
        })
    }
}

/// Language of the dashboard labels.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lang {
    /// Turkish.
    #[default]
    Tr,

    /// English.
    En,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
