//! Configuration handling for the ragcell CLI.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use ragcell_core::{BackendKind, DistanceMetric};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Which similarity backend to use
    #[serde(default)]
    pub backend: BackendKind,

    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding provider configuration (vector backend)
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Managed vector store configuration (remote backend)
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Snapshot file path; `None` uses the XDG data directory
    pub snapshot_path: Option<PathBuf>,

    /// Disable snapshot load/save entirely
    #[serde(default)]
    pub ephemeral: bool,
}

/// Chunking-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    1000
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model identifier sent to the provider
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Expected vector dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Per-request deadline (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Max concurrent provider calls
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Vector comparison used by the flat index
    #[serde(default)]
    pub metric: DistanceMetric,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_dimension() -> usize {
    1536
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            endpoint: default_embedding_endpoint(),
            api_key_env: default_api_key_env(),
            dimension: default_dimension(),
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
            metric: DistanceMetric::default(),
        }
    }
}

/// Managed vector store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the managed store
    #[serde(default = "default_remote_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_remote_api_key_env")]
    pub api_key_env: String,

    /// Per-request deadline (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_remote_endpoint() -> String {
    "http://localhost:9090".to_string()
}

fn default_remote_api_key_env() -> String {
    "RAGCELL_REMOTE_API_KEY".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_remote_endpoint(),
            api_key_env: default_remote_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Query-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Result count when the caller gives none
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Upper bound on requested result count
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Short-circuit greeting-style queries
    #[serde(default = "default_true")]
    pub conversational_filter: bool,

    /// Return the full corpus for translation-style queries
    #[serde(default = "default_true")]
    pub translation_filter: bool,

    /// Scoring deadline (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_top_k() -> usize {
    5
}

fn default_max_top_k() -> usize {
    100
}

fn default_true() -> bool {
    true
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            conversational_filter: default_true(),
            translation_filter: default_true(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or the default location, or fall back to
    /// defaults when no file exists.
    pub fn load(path: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.clone(),
            None => match config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &PathBuf) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("parse {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Snapshot path from config, or the XDG data directory default.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        if self.store.ephemeral {
            return None;
        }
        self.store
            .snapshot_path
            .clone()
            .or_else(|| data_dir().map(|d| d.join("documents.json")))
    }

    /// A sample configuration file with all defaults spelled out.
    pub fn sample_toml() -> String {
        let sample = Self::default();
        toml::to_string_pretty(&sample)
            .unwrap_or_else(|_| String::from("# failed to render sample config"))
    }
}

/// XDG data directory.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("RAGCELL_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("", "", "ragcell").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Default config file path.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("RAGCELL_CONFIG_DIR") {
        return Some(PathBuf::from(dir).join("config.toml"));
    }
    ProjectDirs::from("", "", "ragcell").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pick_the_lexical_backend() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Lexical);
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.query.default_top_k, 5);
        assert!(config.query.conversational_filter);
        assert!(config.query.translation_filter);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            backend = "vector"

            [embedding]
            model = "custom-embed"
            dimension = 768
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Vector);
        assert_eq!(config.embedding.model, "custom-embed");
        assert_eq!(config.embedding.dimension, 768);
        assert_eq!(config.embedding.timeout_secs, 10);
        assert_eq!(config.chunking.chunk_size, 1000);
    }

    #[test]
    fn sample_toml_parses_back() {
        let sample = Config::sample_toml();
        let parsed: Config = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.backend, BackendKind::Lexical);
    }

    #[test]
    fn ephemeral_store_has_no_snapshot_path() {
        let config: Config = toml::from_str(
            r#"
            [store]
            ephemeral = true
            "#,
        )
        .unwrap();
        assert!(config.snapshot_path().is_none());
    }
}
