//! Configuration management for ragchat.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config files (.ragchat/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::retry::RetryPolicy;

/// Model identifiers offered by the model selector.
pub const KNOWN_MODELS: &[&str] = &[
    "anthropic.claude-3-haiku-20240307-v1:0",
    "anthropic.claude-3-5-sonnet-20240620-v1:0",
];

/// Placeholder knowledge base id shipped in the default configuration.
pub const PLACEHOLDER_KNOWLEDGE_BASE_ID: &str = "your-knowledge-base-id";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .ragchat/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Hosted text-generation model identifier
    pub model: String,

    /// Knowledge collection queried for context
    pub knowledge_base_id: String,

    /// Sampling temperature for answers (0.0 - 1.0)
    pub temperature: f32,

    /// Nucleus sampling for answers (0.0 - 1.0)
    pub top_p: f32,

    /// Connection settings for the hosted services
    pub service: ServiceConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Connection settings shared by the generation and retrieval clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// AWS region hosting both services
    pub region: String,

    /// Override for the text-generation endpoint
    #[serde(rename = "runtimeEndpoint", skip_serializing_if = "Option::is_none")]
    pub runtime_endpoint: Option<String>,

    /// Override for the retrieval endpoint
    #[serde(rename = "agentRuntimeEndpoint", skip_serializing_if = "Option::is_none")]
    pub agent_runtime_endpoint: Option<String>,

    /// Environment variable holding the API key
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: u64,

    /// Retry settings for throttling-class errors
    pub retry: RetryPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            runtime_endpoint: None,
            agent_runtime_endpoint: None,
            api_key_env: "AWS_BEARER_TOKEN_BEDROCK".to_string(),
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Base URL of the text-generation service.
    pub fn runtime_endpoint(&self) -> String {
        self.runtime_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }

    /// Base URL of the retrieval service.
    pub fn agent_runtime_endpoint(&self) -> String {
        self.agent_runtime_endpoint.clone().unwrap_or_else(|| {
            format!("https://bedrock-agent-runtime.{}.amazonaws.com", self.region)
        })
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    chat: Option<ChatSection>,
    service: Option<ServiceSection>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ChatSection {
    model: Option<String>,
    #[serde(rename = "knowledgeBaseId")]
    knowledge_base_id: Option<String>,
    temperature: Option<f32>,
    #[serde(rename = "topP")]
    top_p: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ServiceSection {
    region: Option<String>,
    #[serde(rename = "runtimeEndpoint")]
    runtime_endpoint: Option<String>,
    #[serde(rename = "agentRuntimeEndpoint")]
    agent_runtime_endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
    retry: Option<RetryPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

/// Command-line overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub workspace: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub model: Option<String>,
    pub knowledge_base_id: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub region: Option<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            model: KNOWN_MODELS[0].to_string(),
            knowledge_base_id: PLACEHOLDER_KNOWLEDGE_BASE_ID.to_string(),
            temperature: 1.0,
            top_p: 1.0,
            service: ServiceConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `RAGCHAT_WORKSPACE`: Override workspace path
    /// - `RAGCHAT_CONFIG`: Path to config file
    /// - `RAGCHAT_MODEL`: Model identifier
    /// - `RAGCHAT_KNOWLEDGE_BASE_ID`: Knowledge collection identifier
    /// - `RAGCHAT_TEMPERATURE`: Sampling temperature for answers
    /// - `RAGCHAT_TOP_P`: Nucleus sampling for answers
    /// - `RAGCHAT_REGION`: AWS region
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use ragchat_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Model: {}", config.model);
    /// ```
    pub fn load() -> AppResult<Self> {
        let workspace = std::env::var("RAGCHAT_WORKSPACE").ok().map(PathBuf::from);
        let config_file = std::env::var("RAGCHAT_CONFIG").ok().map(PathBuf::from);
        Self::load_from(workspace, config_file)
    }

    /// Load configuration for an explicit workspace and config file.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }
        config.config_file = config_file;

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.ragchat_dir().join("config.yaml"));

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        if let Ok(model) = std::env::var("RAGCHAT_MODEL") {
            config.model = model;
        }

        if let Ok(kb_id) = std::env::var("RAGCHAT_KNOWLEDGE_BASE_ID") {
            config.knowledge_base_id = kb_id;
        }

        if let Some(temperature) = env_f32("RAGCHAT_TEMPERATURE")? {
            config.temperature = temperature;
        }

        if let Some(top_p) = env_f32("RAGCHAT_TOP_P")? {
            config.top_p = top_p;
        }

        if let Ok(region) = std::env::var("RAGCHAT_REGION") {
            config.service.region = region;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        self.merge(config_file);
        tracing::debug!("Merged config file {:?}", path);
        Ok(())
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(chat) = file.chat {
            if let Some(model) = chat.model {
                self.model = model;
            }
            if let Some(kb_id) = chat.knowledge_base_id {
                self.knowledge_base_id = kb_id;
            }
            if let Some(temperature) = chat.temperature {
                self.temperature = temperature;
            }
            if let Some(top_p) = chat.top_p {
                self.top_p = top_p;
            }
        }

        if let Some(service) = file.service {
            if let Some(region) = service.region {
                self.service.region = region;
            }
            if service.runtime_endpoint.is_some() {
                self.service.runtime_endpoint = service.runtime_endpoint;
            }
            if service.agent_runtime_endpoint.is_some() {
                self.service.agent_runtime_endpoint = service.agent_runtime_endpoint;
            }
            if let Some(api_key_env) = service.api_key_env {
                self.service.api_key_env = api_key_env;
            }
            if let Some(timeout) = service.timeout_secs {
                self.service.timeout_secs = timeout;
            }
            if let Some(retry) = service.retry {
                self.service.retry = retry;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(workspace) = overrides.workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = overrides.config_file {
            self.config_file = Some(config_file);
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(kb_id) = overrides.knowledge_base_id {
            self.knowledge_base_id = kb_id;
        }

        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }

        if let Some(top_p) = overrides.top_p {
            self.top_p = top_p;
        }

        if let Some(region) = overrides.region {
            self.service.region = region;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .ragchat directory.
    pub fn ragchat_dir(&self) -> PathBuf {
        self.workspace.join(".ragchat")
    }

    /// Whether the model id is one of the selector's known models.
    pub fn is_known_model(&self) -> bool {
        KNOWN_MODELS.contains(&self.model.as_str())
    }

    /// Validate settings before any remote call is made.
    pub fn validate(&self) -> AppResult<()> {
        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model identifier cannot be empty".to_string()));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be between 0 and 1, got {}",
                self.temperature
            )));
        }

        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(AppError::Config(format!(
                "Top-p must be between 0 and 1, got {}",
                self.top_p
            )));
        }

        if self.service.timeout_secs == 0 {
            return Err(AppError::Config(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        if self.service.retry.max_attempts == 0 {
            return Err(AppError::Config(
                "Retry maxAttempts must be at least 1".to_string(),
            ));
        }

        if !self.is_known_model() {
            tracing::warn!(
                "Model '{}' is not in the known model list: {}",
                self.model,
                KNOWN_MODELS.join(", ")
            );
        }

        Ok(())
    }

    /// Validate that a knowledge base id has been configured.
    pub fn require_knowledge_base(&self) -> AppResult<&str> {
        let kb_id = self.knowledge_base_id.trim();
        if kb_id.is_empty() || kb_id == PLACEHOLDER_KNOWLEDGE_BASE_ID {
            return Err(AppError::Config(
                "No knowledge base configured. Pass --knowledge-base or set chat.knowledgeBaseId in .ragchat/config.yaml".to_string(),
            ));
        }
        Ok(kb_id)
    }
}

fn env_f32(name: &str) -> AppResult<Option<f32>> {
    match std::env::var(name) {
        Ok(value) => parse_f32(name, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_f32(name: &str, value: &str) -> AppResult<f32> {
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {} value {:?}: {}", name, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model, "anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.top_p, 1.0);
        assert_eq!(config.service.region, "us-east-1");
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_default_endpoints_follow_region() {
        let mut service = ServiceConfig::default();
        service.region = "eu-west-1".to_string();
        assert_eq!(
            service.runtime_endpoint(),
            "https://bedrock-runtime.eu-west-1.amazonaws.com"
        );
        assert_eq!(
            service.agent_runtime_endpoint(),
            "https://bedrock-agent-runtime.eu-west-1.amazonaws.com"
        );

        service.runtime_endpoint = Some("http://localhost:9000".to_string());
        assert_eq!(service.runtime_endpoint(), "http://localhost:9000");
    }

    #[test]
    fn test_merge_yaml_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".ragchat");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.yaml"),
            r#"
chat:
  model: anthropic.claude-3-5-sonnet-20240620-v1:0
  knowledgeBaseId: KB12345
  temperature: 0.3
  topP: 0.9
service:
  region: us-west-2
  timeoutSecs: 10
  retry:
    maxAttempts: 5
    baseDelayMs: 50
    maxDelayMs: 1000
logging:
  level: debug
  color: false
"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.workspace = temp.path().to_path_buf();
        config.merge_yaml(&dir.join("config.yaml")).unwrap();

        assert_eq!(config.model, "anthropic.claude-3-5-sonnet-20240620-v1:0");
        assert_eq!(config.knowledge_base_id, "KB12345");
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.top_p, 0.9);
        assert_eq!(config.service.region, "us-west-2");
        assert_eq!(config.service.timeout_secs, 10);
        assert_eq!(config.service.retry.max_attempts, 5);
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert!(config.no_color);
    }

    #[test]
    fn test_partial_retry_block_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "service:\n  retry:\n    maxAttempts: 5\n").unwrap();

        let mut config = AppConfig::default();
        config.merge_yaml(&path).unwrap();

        let defaults = RetryPolicy::default();
        assert_eq!(config.service.retry.max_attempts, 5);
        assert_eq!(config.service.retry.base_delay_ms, defaults.base_delay_ms);
        assert_eq!(config.service.retry.max_delay_ms, defaults.max_delay_ms);
    }

    #[test]
    fn test_missing_explicit_config_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = AppConfig::load_from(
            Some(temp.path().to_path_buf()),
            Some(temp.path().join("nope.yaml")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_workspace_is_error() {
        let result = AppConfig::load_from(Some(PathBuf::from("/definitely/not/here")), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(ConfigOverrides {
            model: Some("anthropic.claude-3-5-sonnet-20240620-v1:0".to_string()),
            knowledge_base_id: Some("KB999".to_string()),
            temperature: Some(0.2),
            top_p: Some(0.5),
            verbose: true,
            ..Default::default()
        });

        assert_eq!(overridden.model, "anthropic.claude-3-5-sonnet-20240620-v1:0");
        assert_eq!(overridden.knowledge_base_id, "KB999");
        assert_eq!(overridden.temperature, 0.2);
        assert_eq!(overridden.top_p, 0.5);
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_parse_sampling_env_values() {
        assert_eq!(parse_f32("RAGCHAT_TEMPERATURE", " 0.25 ").unwrap(), 0.25);
        assert!(matches!(
            parse_f32("RAGCHAT_TOP_P", "high"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_validate_sampling_ranges() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.temperature = 1.5;
        assert!(config.validate().is_err());

        config.temperature = 0.0;
        config.top_p = -0.1;
        assert!(config.validate().is_err());

        config.top_p = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_service_settings() {
        let mut config = AppConfig::default();
        config.service.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.service.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_model_is_allowed() {
        let mut config = AppConfig::default();
        config.model = "anthropic.claude-v2".to_string();
        assert!(!config.is_known_model());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_require_knowledge_base_rejects_placeholder() {
        let mut config = AppConfig::default();
        assert!(config.require_knowledge_base().is_err());

        config.knowledge_base_id = "  ".to_string();
        assert!(config.require_knowledge_base().is_err());

        config.knowledge_base_id = "KB12345".to_string();
        assert_eq!(config.require_knowledge_base().unwrap(), "KB12345");
    }
}
