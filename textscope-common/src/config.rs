//! Configuration loading and root folder resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (`TEXTSCOPE_*`, read by the CLI parser)
//! 3. TOML config file
//! 4. Built-in defaults
//!
//! The TOML file is `--config` when given, otherwise the first of
//! `~/.config/textscope/config.toml` and `/etc/textscope/config.toml` that exists.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "TEXTSCOPE_ROOT_FOLDER";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 10_000;
pub const DEFAULT_KEY_PHRASE_COUNT: usize = 10;
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;
pub const DATABASE_FILE_NAME: &str = "textscope.db";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!("Unknown environment: {}", other))),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
///
/// Every section and field is optional; missing values take the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding the database (and anything else the service writes)
    pub root_folder: Option<PathBuf>,
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// Directory served under `/static`
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::Development,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum accepted text length, in characters
    pub max_content_length: usize,
    pub key_phrase_count: usize,
    pub summary_sentences: usize,
    /// Directory overriding the embedded language resources
    pub resource_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            key_phrase_count: DEFAULT_KEY_PHRASE_COUNT,
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
            resource_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; defaults to `<root_folder>/textscope.db`
    pub database: Option<PathBuf>,
    /// Answer with an unsaved analysis instead of 500 when the insert fails
    pub return_unsaved_on_failure: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load the explicit config file, or the first default location that
    /// exists, or fall back to built-in defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            info!("Loading config file {}", path.display());
            return Self::load(path);
        }

        match find_config_file() {
            Some(path) => {
                info!("Loading config file {}", path.display());
                Self::load(&path)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Values given on the command line or through `TEXTSCOPE_*` variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub environment: Option<Environment>,
    pub resource_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub max_content_length: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub max_content_length: usize,
    pub key_phrase_count: usize,
    pub summary_sentences: usize,
    pub resource_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
    pub return_unsaved_on_failure: bool,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let root_folder = get_default_root_folder();
        Self {
            database_path: root_folder.join(DATABASE_FILE_NAME),
            root_folder,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::Development,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            key_phrase_count: DEFAULT_KEY_PHRASE_COUNT,
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
            resource_dir: None,
            static_dir: None,
            cors_origins: vec!["*".to_string()],
            return_unsaved_on_failure: false,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Merge overrides over the TOML file over defaults, then validate
    pub fn resolve(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let root_folder = resolve_root_folder(
            overrides.root_folder.as_deref(),
            ROOT_FOLDER_ENV,
            toml_config.root_folder.as_deref(),
        );

        let database_path = overrides
            .database
            .clone()
            .or_else(|| toml_config.storage.database.clone())
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME));

        let config = Self {
            database_path,
            host: overrides
                .host
                .clone()
                .unwrap_or_else(|| toml_config.server.host.clone()),
            port: overrides.port.unwrap_or(toml_config.server.port),
            environment: overrides
                .environment
                .unwrap_or(toml_config.server.environment),
            max_content_length: overrides
                .max_content_length
                .unwrap_or(toml_config.analysis.max_content_length),
            key_phrase_count: toml_config.analysis.key_phrase_count,
            summary_sentences: toml_config.analysis.summary_sentences,
            resource_dir: overrides
                .resource_dir
                .clone()
                .or_else(|| toml_config.analysis.resource_dir.clone()),
            static_dir: overrides
                .static_dir
                .clone()
                .or_else(|| toml_config.server.static_dir.clone()),
            cors_origins: toml_config.security.cors_origins.clone(),
            return_unsaved_on_failure: toml_config.storage.return_unsaved_on_failure,
            log_level: overrides
                .log_level
                .clone()
                .unwrap_or_else(|| toml_config.logging.level.clone()),
            root_folder,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_content_length == 0 {
            return Err(Error::Config(
                "max_content_length must be greater than 0".to_string(),
            ));
        }
        if self.key_phrase_count == 0 {
            return Err(Error::Config(
                "key_phrase_count must be greater than 0".to_string(),
            ));
        }
        if self.summary_sentences == 0 {
            return Err(Error::Config(
                "summary_sentences must be greater than 0".to_string(),
            ));
        }
        if self.cors_origins.is_empty() {
            return Err(Error::Config("cors_origins must not be empty".to_string()));
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Root folder resolution:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    get_default_root_folder()
}

/// First existing default config file for the platform
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("textscope").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/textscope/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/textscope (or /var/lib/textscope for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("textscope"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/textscope"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("textscope"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/textscope"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("textscope"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\textscope"))
    } else {
        PathBuf::from("./textscope_data")
    }
}
