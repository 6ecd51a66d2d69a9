//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// MongoDB configuration.
    #[serde(default)]
    pub mongo: MongoConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// MongoDB configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    /// Connection string.
    #[serde(default = "default_uri")]
    pub uri: String,
    /// Database name.
    #[serde(default = "default_database")]
    pub database: String,
    /// Maximum number of connections in the driver pool.
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            max_pool_size: default_max_pool_size(),
        }
    }
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "finbook".to_string()
}

fn default_max_pool_size() -> u32 {
    10
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_mongo_defaults() {
        let mongo = MongoConfig::default();
        assert_eq!(mongo.uri, "mongodb://localhost:27017");
        assert_eq!(mongo.database, "finbook");
        assert_eq!(mongo.max_pool_size, 10);
    }
}
