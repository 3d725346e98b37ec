/// Camila Product API - Configuration management.
///
/// Loads configuration from TOML files with multi-environment support.
/// Configuration is loaded from the crate root `config/` directory.
///
/// Loading order:
/// 1. config/default.toml - default values
/// 2. config/{environment}.toml - environment-specific values
/// 3. config/local.toml - local overrides (not versioned)
///
/// Configuration directory lookup order:
/// 1. CAMILA_CONFIG_DIR environment variable (if set)
/// 2. Crate root config/ directory (development)
/// 3. /usr/local/etc/camila/ (production)
use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            "testing" | "test" => Self::Testing,
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format for log aggregation.
    Json,
    /// Human-readable text format (default).
    #[default]
    Text,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Application configuration.
/// All values must be defined in TOML files.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,
    pub server: ServerConfig,
    pub websocket: WebSocketConfig,
    pub logging: LoggingConfig,
    /// Product catalog source configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route prefix for all endpoints (e.g. "/product-dev/api").
    pub base_path: String,
}

/// WebSocket configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketConfig {
    /// Ping interval to keep WebSocket connections alive.
    pub ping_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error.
    pub level: String,
    /// Log format: json or text.
    pub format: LogFormat,
}

/// Product catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional JSON file holding the product catalog. When unset, the
    /// built-in seed catalog is used.
    #[serde(default)]
    pub data_path: Option<String>,
}

impl Config {
    /// Load configuration from TOML files.
    ///
    /// Automatically finds the configuration directory in this order:
    /// 1. CAMILA_CONFIG_DIR environment variable (if set)
    /// 2. Crate root config/ directory (development)
    /// 3. /usr/local/etc/camila/ (production)
    ///
    /// Then loads configuration files in the following order:
    /// 1. config/default.toml
    /// 2. config/{environment}.toml (development, testing, production)
    /// 3. config/local.toml (optional, for local overrides)
    pub fn load() -> Result<Self, crate::error::AppError> {
        let config_path = Self::find_config_dir()?;
        Self::load_from_path(config_path)
    }

    /// Find the configuration directory.
    fn find_config_dir() -> Result<PathBuf, crate::error::AppError> {
        // 1. Check for explicit CAMILA_CONFIG_DIR environment variable
        if let Ok(path) = std::env::var("CAMILA_CONFIG_DIR") {
            let config_path = PathBuf::from(&path);
            if config_path.exists() {
                return Ok(config_path);
            }
            return Err(crate::error::AppError::Config(format!(
                "CAMILA_CONFIG_DIR points to non-existent directory: {}",
                path
            )));
        }

        // 2. Check crate root config/ directory (development)
        // CARGO_MANIFEST_DIR is set at compile time to the crate's directory
        let crate_config = Self::crate_root().join("config");
        if crate_config.exists() {
            return Ok(crate_config);
        }

        // 3. Check system configuration directory (production)
        let system_config = Path::new("/usr/local/etc/camila");
        if system_config.exists() {
            return Ok(system_config.to_path_buf());
        }

        // No configuration directory found
        Err(crate::error::AppError::Config(
            "Configuration directory not found. Searched:\n\
             - CAMILA_CONFIG_DIR environment variable\n\
             - Crate root config/ directory\n\
             - /usr/local/etc/camila/"
                .to_string(),
        ))
    }

    /// Get the crate root directory (set at compile time).
    fn crate_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).to_path_buf()
    }

    /// Load configuration from a specific directory path.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, crate::error::AppError> {
        // Determine environment from CAMILA_ENVIRONMENT or default
        let environment = std::env::var("CAMILA_ENVIRONMENT")
            .map(|e| Environment::parse(&e))
            .unwrap_or(Environment::Development);

        Self::load_with_environment(config_path, environment)
    }

    /// Load configuration with a specific environment.
    pub fn load_with_environment<P: AsRef<Path>>(
        config_path: P,
        environment: Environment,
    ) -> Result<Self, crate::error::AppError> {
        let config_path = config_path.as_ref();

        let mut builder = ConfigBuilder::builder();

        // 1. Load default.toml (required)
        let default_path = config_path.join("default.toml");
        if !default_path.exists() {
            return Err(crate::error::AppError::Config(format!(
                "Configuration file not found: {}",
                default_path.display()
            )));
        }
        builder = builder.add_source(File::from(default_path));

        // 2. Load {environment}.toml
        let env_path = config_path.join(format!("{}.toml", environment.as_str()));
        if env_path.exists() {
            builder = builder.add_source(File::from(env_path));
        }

        // 3. Load local.toml (optional, not versioned)
        // Skip local.toml in testing environment to keep test runs reproducible
        if environment != Environment::Testing {
            let local_path = config_path.join("local.toml");
            if local_path.exists() {
                builder = builder.add_source(File::from(local_path));
            }
        }

        // Build configuration
        let settings = builder.build().map_err(Self::config_error)?;

        // Deserialize into Config
        let mut config: Config = settings.try_deserialize().map_err(Self::config_error)?;

        // Force environment in case it's not in the file
        config.environment = environment;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration invariants that TOML deserialization cannot express.
    fn validate(&self) -> Result<(), crate::error::AppError> {
        if !self.server.base_path.starts_with('/') {
            return Err(crate::error::AppError::Config(format!(
                "server.base_path must start with '/': {}",
                self.server.base_path
            )));
        }
        if self.server.base_path.ends_with('/') {
            return Err(crate::error::AppError::Config(format!(
                "server.base_path must not end with '/': {}",
                self.server.base_path
            )));
        }
        if self.websocket.ping_interval_secs == 0 {
            return Err(crate::error::AppError::Config(
                "websocket.ping_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the catalog data file path, if configured.
    ///
    /// - Absolute paths (starting with "/") are returned unchanged.
    /// - Relative paths are resolved from the crate root.
    pub fn catalog_data_path(&self) -> Option<PathBuf> {
        self.catalog.data_path.as_ref().map(|path| {
            if path.starts_with('/') {
                PathBuf::from(path)
            } else {
                Self::crate_root().join(path)
            }
        })
    }

    fn config_error(e: ConfigError) -> crate::error::AppError {
        crate::error::AppError::Config(e.to_string())
    }
}
