use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoriaConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub compression: CompressionConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `"remote"` (HTTP embedding service) or `"none"` (store without vectors).
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub dimensions: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CompressionConfig {
    /// Token budget used by session consolidation.
    pub default_target_tokens: usize,
    /// Similarity floor for semantic recall.
    pub similarity_threshold: f64,
    /// How many candidate memories to load when ranking semantically.
    pub candidate_limit: usize,
    /// How many memories/tasks the rendered memory context includes.
    pub context_max_memories: usize,
    pub context_max_tasks: usize,
}

impl Default for MemoriaConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            compression: CompressionConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 8787,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_memoria_dir()
            .join("memory.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "none".into(),
            endpoint: String::new(),
            model: "bge-large-en-v1.5".into(),
            dimensions: 1024,
            timeout_secs: 10,
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_target_tokens: 2000,
            similarity_threshold: 0.7,
            candidate_limit: 200,
            context_max_memories: 3,
            context_max_tasks: 5,
        }
    }
}

/// Returns `~/.memoria/`
pub fn default_memoria_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".memoria")
}

/// Returns the default config file path: `~/.memoria/config.toml`
pub fn default_config_path() -> PathBuf {
    default_memoria_dir().join("config.toml")
}

impl MemoriaConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MemoriaConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MEMORIA_DB, MEMORIA_LOG_LEVEL,
    /// MEMORIA_EMBEDDING_URL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MEMORIA_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("MEMORIA_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("MEMORIA_EMBEDDING_URL") {
            self.embedding.provider = "remote".into();
            self.embedding.endpoint = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MemoriaConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.embedding.provider, "none");
        assert_eq!(config.compression.default_target_tokens, 2000);
        assert!(config.storage.db_path.ends_with("memory.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 9000

[storage]
db_path = "/tmp/test.db"

[embedding]
provider = "remote"
endpoint = "http://localhost:8080/embed"

[compression]
default_target_tokens = 1500
"#;
        let config: MemoriaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.embedding.provider, "remote");
        assert_eq!(config.compression.default_target_tokens, 1500);
        // defaults still apply for unset fields
        assert_eq!(config.compression.similarity_threshold, 0.7);
        assert_eq!(config.embedding.dimensions, 1024);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = MemoriaConfig::default();
        std::env::set_var("MEMORIA_DB", "/tmp/override.db");
        std::env::set_var("MEMORIA_LOG_LEVEL", "trace");
        std::env::set_var("MEMORIA_EMBEDDING_URL", "http://ai.internal/embed");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.embedding.provider, "remote");
        assert_eq!(config.embedding.endpoint, "http://ai.internal/embed");

        // Clean up
        std::env::remove_var("MEMORIA_DB");
        std::env::remove_var("MEMORIA_LOG_LEVEL");
        std::env::remove_var("MEMORIA_EMBEDDING_URL");
    }
}
