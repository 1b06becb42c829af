use citadel_client::DEFAULT_API_URL;

/// Database URL that selects the in-memory cache instead of SQLite.
pub const MEMORY_DATABASE: &str = "memory";

const DEFAULT_DATABASE_URL: &str = "sqlite://citadel.db";

/// How the detail lookups decide whether the network is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityMode {
    /// Probe the host's network interfaces on every lookup.
    Auto,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be one of {expected}, got {value:?}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub database_url: String,
    pub connectivity: ConnectivityMode,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var        | Default                               |
    /// |----------------|---------------------------------------|
    /// | `API_BASE_URL` | `https://rickandmortyapi.com/api`     |
    /// | `DATABASE_URL` | `sqlite://citadel.db` (`memory` = RAM)|
    /// | `CONNECTIVITY` | `auto`                                |
    /// | `LOG_FORMAT`   | `text`                                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of
    /// a variable or `None` when unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = non_empty(&lookup, "API_BASE_URL", DEFAULT_API_URL)?;
        let database_url = non_empty(&lookup, "DATABASE_URL", DEFAULT_DATABASE_URL)?;

        let connectivity = match lookup("CONNECTIVITY").as_deref().map(str::trim) {
            None | Some("") | Some("auto") => ConnectivityMode::Auto,
            Some("online") => ConnectivityMode::Online,
            Some("offline") => ConnectivityMode::Offline,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "CONNECTIVITY",
                    value: other.to_string(),
                    expected: "auto, online, offline",
                })
            }
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                    expected: "text, json",
                })
            }
        };

        Ok(Self {
            api_base_url,
            database_url,
            connectivity,
            log_format,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE
    }
}

fn non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        None => Ok(default.to_string()),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { key }),
        Some(value) => Ok(value.trim().to_string()),
    }
}
