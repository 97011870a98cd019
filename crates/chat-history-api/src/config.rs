use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use chat_history_store::StoreBackend;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on one request, store calls included
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub region: Option<String>,
    /// DynamoDB Local or another compatible endpoint
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// JSON records loaded by the memory backend at startup
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
    pub collection: String,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            database: "chat_history".to_string(),
            collection: "chats".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Header carrying the subject already verified by the upstream authorizer
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            identity_header: default_identity_header(),
        }
    }
}

fn default_identity_header() -> String {
    "x-authenticated-user".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml, only when ENV is set (ENV=local selects the
    ///    in-memory store)
    /// 3. CHAT_* variables, `__` between nested keys (CHAT_STORE__TABLE_NAME)
    /// 4. DYNAMODB_TABLE_NAME, AWS_REGION and MONGODB_URI
    pub fn load() -> Result<Self, ConfigError> {
        let profile = std::env::var("ENV").ok().filter(|env| !env.is_empty());
        Self::load_from("config", profile.as_deref())
    }

    /// Same as [`Config::load`] with an explicit config directory and profile
    pub fn load_from(dir: impl AsRef<Path>, profile: Option<&str>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let source = |name: &str| {
            File::with_name(&dir.join(name).to_string_lossy()).required(false)
        };

        let mut builder = ConfigLoader::builder().add_source(source("default"));
        if let Some(profile) = profile {
            builder = builder.add_source(source(profile));
        }
        let builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;
        cfg.apply_legacy_env();
        cfg.validate()?;

        Ok(cfg)
    }

    fn apply_legacy_env(&mut self) {
        if let Ok(table_name) = std::env::var("DYNAMODB_TABLE_NAME") {
            self.store.table_name = table_name;
        }
        if let Ok(region) = std::env::var("AWS_REGION") {
            self.store.region = Some(region);
        }
        if let Ok(uri) = std::env::var("MONGODB_URI") {
            self.mongodb_uri = uri;
        }
    }

    /// Check that the selected backend has what it needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.store.backend {
            StoreBackend::Dynamodb if self.store.table_name.is_empty() => Err(ConfigError::Message(
                "DYNAMODB_TABLE_NAME (or store.table_name) is required for the dynamodb backend"
                    .to_string(),
            )),
            StoreBackend::Mongodb if self.mongodb_uri.is_empty() => Err(ConfigError::Message(
                "MONGODB_URI environment variable is required for the mongodb backend".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 3000

        [store]
        backend = "memory"

        [logging]
        level = "debug"
        format = "json"
    "#;

    #[test]
    fn test_config_structure() {
        let config: Config = toml::from_str(TOML).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.mongodb.collection, "chats");
        assert_eq!(config.auth.identity_header, "x-authenticated-user");
    }

    #[test]
    fn test_validate_requires_table_for_dynamodb() {
        let mut config: Config = toml::from_str(TOML).unwrap();
        config.store.backend = StoreBackend::Dynamodb;
        assert!(config.validate().is_err());

        config.store.table_name = "chat-history".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_uri_for_mongodb() {
        let mut config: Config = toml::from_str(TOML).unwrap();
        config.store.backend = StoreBackend::Mongodb;
        assert!(config.validate().is_err());
    }

    fn write_profiles(dir: &Path) {
        std::fs::write(
            dir.join("default.toml"),
            r#"
                [server]
                host = "0.0.0.0"
                port = 3000

                [store]
                backend = "dynamodb"
                table_name = "chat-history"

                [logging]
                level = "info"
                format = "json"
            "#,
        )
        .unwrap();
        std::fs::write(
            dir.join("local.toml"),
            r#"
                [store]
                backend = "memory"
            "#,
        )
        .unwrap();
    }

    #[test]
    fn test_no_profile_keeps_dynamodb_backend() {
        let dir = tempfile::tempdir().unwrap();
        write_profiles(dir.path());

        let config = Config::load_from(dir.path(), None).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Dynamodb);
        assert!(config.store.seed_file.is_none());
    }

    #[test]
    fn test_local_profile_selects_memory_backend() {
        let dir = tempfile::tempdir().unwrap();
        write_profiles(dir.path());

        let config = Config::load_from(dir.path(), Some("local")).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_unknown_profile_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_profiles(dir.path());

        let config = Config::load_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Dynamodb);
    }

    #[test]
    fn test_shipped_default_has_no_memory_backend() {
        let shipped = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
        let config: Config = toml::from_str(&std::fs::read_to_string(shipped).unwrap()).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Dynamodb);
        assert!(config.store.seed_file.is_none());
    }
}
