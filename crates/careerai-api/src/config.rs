use config::{Config as ConfigLoader, ConfigError, File};
use serde::Deserialize;
use std::path::Path;

use careerai_persist::StoreBackend;
use careerai_types::{CoachConfig, DEFAULT_SESSION_TITLE};

/// Environment prefixes and the section each one overrides
const ENV_SECTIONS: &[(&str, &str)] = &[
    ("SERVER_", "server"),
    ("STORE_", "store"),
    ("COACH_", "coach"),
    ("LOG_", "logging"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub coach: CoachSettings,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoachSettings {
    #[serde(default = "default_session_title")]
    pub default_session_title: String,
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: usize,
}

fn default_session_title() -> String {
    DEFAULT_SESSION_TITLE.to_string()
}

fn default_max_list_limit() -> usize {
    100
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self {
            default_session_title: default_session_title(),
            max_list_limit: default_max_list_limit(),
        }
    }
}

impl From<CoachSettings> for CoachConfig {
    fn from(settings: CoachSettings) -> Self {
        CoachConfig::new()
            .with_default_session_title(settings.default_session_title)
            .with_max_list_limit(settings.max_list_limit)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                request_timeout_secs: default_timeout(),
            },
            cors: CorsConfig {
                enabled: false,
                origins: Vec::new(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database: "careerai".to_string(),
            },
            coach: CoachSettings::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            mongodb_uri: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables with SERVER_, STORE_, COACH_ and LOG_ prefixes
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for (key, value) in env_overrides(std::env::vars()) {
            builder = builder.set_override(key, value)?;
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        if let Ok(uri) = std::env::var("MONGODB_URI") {
            cfg.mongodb_uri = uri;
        }
        cfg.validate()?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == StoreBackend::Mongodb && self.mongodb_uri.is_empty() {
            return Err(ConfigError::Message(
                "MONGODB_URI environment variable is required for the mongodb backend".to_string(),
            ));
        }
        if self.coach.max_list_limit == 0 {
            return Err(ConfigError::Message(
                "coach.max_list_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn coach_config(&self) -> CoachConfig {
        self.coach.clone().into()
    }
}

/// Map `SERVER_PORT=8080` style variables to `server.port` keys
fn env_overrides(vars: impl Iterator<Item = (String, String)>) -> Vec<(String, String)> {
    vars.filter_map(|(name, value)| {
        ENV_SECTIONS.iter().find_map(|(prefix, section)| {
            let field = name.strip_prefix(prefix)?;
            if field.is_empty() {
                return None;
            }
            Some((format!("{}.{}", section, field.to_lowercase()), value.clone()))
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 3000

        [cors]
        enabled = true
        origins = ["http://localhost:3000"]

        [store]
        backend = "mongodb"
        database = "test"

        [coach]
        default_session_title = "Untitled"

        [logging]
        level = "debug"
        format = "json"
    "#;

    #[test]
    fn test_config_structure() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.store.backend, StoreBackend::Mongodb);
        assert_eq!(config.store.database, "test");
        assert_eq!(config.coach.max_list_limit, 100);
        assert_eq!(config.coach_config().default_session_title, "Untitled");
    }

    #[test]
    fn test_mongodb_backend_requires_uri() {
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        assert!(config.validate().is_err());

        config.mongodb_uri = "mongodb://localhost:27017".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_memory_backend_needs_no_secret() {
        let config = Config::default();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_map_to_sections() {
        let vars = vec![
            ("SERVER_PORT".to_string(), "9000".to_string()),
            ("LOG_FORMAT".to_string(), "json".to_string()),
            ("STORE_BACKEND".to_string(), "mongodb".to_string()),
            ("COACH_MAX_LIST_LIMIT".to_string(), "10".to_string()),
            ("SERVER_".to_string(), "ignored".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ];
        let mut overrides = env_overrides(vars.into_iter());
        overrides.sort();
        assert_eq!(
            overrides,
            vec![
                ("coach.max_list_limit".to_string(), "10".to_string()),
                ("logging.format".to_string(), "json".to_string()),
                ("server.port".to_string(), "9000".to_string()),
                ("store.backend".to_string(), "mongodb".to_string()),
            ]
        );
    }
}
