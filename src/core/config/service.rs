use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::paths::AppPaths;
use crate::core::errors::ApiError;

const REDACT_PLACEHOLDER: &str = "****";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub llm: LlmConfig,
    pub rag: RagSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            dataset: DatasetConfig::default(),
            llm: LlmConfig::default(),
            rag: RagSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 7860 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub csv_path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("laptops.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f64,
    pub max_tokens: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            chat_model: "llama-3.1-8b-instant".to_string(),
            embedding_model: "nomic-embed-text-v1.5".to_string(),
            temperature: 0.0,
            max_tokens: 500,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            chunk_size: 400,
            chunk_overlap: 50,
            top_k: 5,
        }
    }
}

/// Secrets file shape: only the keys that must never land in `config.yml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SecretsFile {
    llm: SecretsLlm,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SecretsLlm {
    api_key: Option<String>,
}

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("LAPREC_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = self.paths.user_data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        self.paths.project_root.join("config.yml")
    }

    /// Loads `config.yml`, merges the secrets file, then applies env
    /// overrides. The API key never lives in the public config file.
    pub fn load(&self) -> Result<AppConfig, ApiError> {
        let mut config = load_config_file(&self.config_path())?;

        let secrets = load_secrets_file(&self.paths.secrets_path)?;
        if config.llm.api_key.is_none() {
            config.llm.api_key = secrets.llm.api_key;
        }

        apply_api_key_override(&mut config, env::var("GROQ_API_KEY").ok());
        Ok(config)
    }

    /// Config view safe to expose over HTTP: the API key is masked.
    pub fn redacted(&self, config: &AppConfig) -> Value {
        let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
        if let Some(llm) = value.get_mut("llm").and_then(Value::as_object_mut) {
            if llm.contains_key("api_key") {
                llm.insert("api_key".to_string(), Value::String(REDACT_PLACEHOLDER.into()));
            }
        }
        value
    }
}

fn load_config_file(path: &Path) -> Result<AppConfig, ApiError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| ApiError::internal(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| ApiError::internal(format!("Invalid config {}: {}", path.display(), e)))
}

fn load_secrets_file(path: &Path) -> Result<SecretsFile, ApiError> {
    if !path.exists() {
        return Ok(SecretsFile::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| ApiError::internal(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| ApiError::internal(format!("Invalid secrets {}: {}", path.display(), e)))
}

fn apply_api_key_override(config: &mut AppConfig, env_key: Option<String>) {
    if let Some(key) = env_key {
        let key = key.trim().to_string();
        if !key.is_empty() {
            config.llm.api_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_expectations() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 7860);
        assert_eq!(config.rag.chunk_size, 400);
        assert_eq!(config.rag.chunk_overlap, 50);
        assert_eq!(config.rag.top_k, 5);
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.llm.max_tokens, 500);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn env_key_wins_over_secrets_file() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("from-secrets".to_string());

        apply_api_key_override(&mut config, Some("from-env".to_string()));
        assert_eq!(config.llm.api_key.as_deref(), Some("from-env"));

        apply_api_key_override(&mut config, Some("   ".to_string()));
        assert_eq!(config.llm.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn redaction_masks_api_key() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths {
            project_root: tmp.path().to_path_buf(),
            user_data_dir: tmp.path().to_path_buf(),
            log_dir: tmp.path().join("logs"),
            index_db_path: tmp.path().join("laptop_index.db"),
            secrets_path: tmp.path().join("secrets.yaml"),
        };
        let service = ConfigService::new(Arc::new(paths));

        let mut config = AppConfig::default();
        config.llm.api_key = Some("gsk_secret".to_string());

        let redacted = service.redacted(&config);
        assert_eq!(
            redacted["llm"]["api_key"],
            Value::String(REDACT_PLACEHOLDER.into())
        );
        assert_eq!(redacted["server"]["port"], 7860);
    }

    #[test]
    fn secrets_file_is_merged_into_config() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("secrets.yaml"),
            "llm:\n  api_key: gsk_from_file\n",
        )
        .unwrap();

        let paths = AppPaths {
            project_root: tmp.path().to_path_buf(),
            user_data_dir: tmp.path().join("nonexistent"),
            log_dir: tmp.path().join("logs"),
            index_db_path: tmp.path().join("laptop_index.db"),
            secrets_path: tmp.path().join("secrets.yaml"),
        };
        let service = ConfigService::new(Arc::new(paths));

        let config = service.load().unwrap();
        // Env may override in CI; only check the file was picked up when no env is set.
        if env::var("GROQ_API_KEY").is_err() {
            assert_eq!(config.llm.api_key.as_deref(), Some("gsk_from_file"));
        }
    }
}
