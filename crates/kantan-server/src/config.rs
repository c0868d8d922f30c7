//! Server configuration.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`kantan.toml`, or the path in `KANTAN_CONFIG`), optional
//! 3. Environment variables: `KANTAN__<SECTION>__<KEY>`, e.g. `KANTAN__LLM__API_KEY`
//!
//! A `.env` file in the working directory is loaded into the environment first.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use kantan_core::resolver::{MatchingAlgorithm, DEFAULT_FUZZY_THRESHOLD};
use kantan_llm::{DEFAULT_MAX_TOKENS, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "KANTAN_CONFIG";

/// Configuration file read when `KANTAN_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "kantan.toml";

const ENV_PREFIX: &str = "KANTAN";
const ENV_SEPARATOR: &str = "__";

/// Longest completion timeout accepted.
const MAX_TIMEOUT_SECS: u64 = 120;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub matching: MatchingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty disables CORS headers.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file holding the directory tables
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("kantan.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// When false, requests skip narrative enrichment entirely
    pub enabled: bool,
    /// OpenAI-compatible base URL (without `/chat/completions`)
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            model: "openai/gpt-4o-mini".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchingConfig {
    pub algorithm: MatchingAlgorithm,
    /// Minimum similarity for the fuzzy algorithm (0, 1]
    pub fuzzy_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            algorithm: MatchingAlgorithm::Substring,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load from `.env`, the configuration file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_with(Some(Path::new(&path)), None)
    }

    /// Load from an optional file and an explicit environment map.
    ///
    /// `env` of `None` reads the process environment. A missing file is
    /// skipped; a malformed one is an error.
    pub fn load_with(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Config::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .try_parsing(true)
            .source(env);

        let config: Config = builder.add_source(environment).build()?.try_deserialize()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.llm.enabled && self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "llm.model must be set when llm.enabled is true".into(),
            ));
        }
        if self.llm.enabled && self.llm.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "llm.base_url must be set when llm.enabled is true".into(),
            ));
        }
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.llm.timeout_secs) {
            return Err(ConfigError::Invalid(format!(
                "llm.timeout_secs must be between 1 and {}, got {}",
                MAX_TIMEOUT_SECS, self.llm.timeout_secs
            )));
        }
        let threshold = self.matching.fuzzy_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "matching.fuzzy_threshold must be in (0, 1], got {}",
                threshold
            )));
        }
        Ok(())
    }

    /// Address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ConfigError::Invalid(format!(
                    "server.host/port do not form a socket address: {}",
                    e
                ))
            })
    }
}
