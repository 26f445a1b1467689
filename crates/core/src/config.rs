//! Configuration management for promptsync.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - A `.env` file in the current directory
//! - Config files (.promptsync/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. The resulting [`AppConfig`] is passed explicitly into
//! every command; nothing below the entry point reads the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Environment variable holding the registry API key.
pub const API_KEY_ENV: &str = "LANGSMITH_API_KEY";

/// Environment variable holding the account namespace used for publishing.
pub const NAMESPACE_ENV: &str = "USERNAME_LANGSMITH_HUB";

/// Environment variable overriding the registry API endpoint.
pub const ENDPOINT_ENV: &str = "LANGSMITH_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "https://api.smith.langchain.com";
pub const DEFAULT_WEB_URL: &str = "https://smith.langchain.com";
pub const DEFAULT_SOURCE_PROMPT: &str = "leonanluppi/bug_to_user_story_v1";
pub const DEFAULT_PULL_OUTPUT: &str = "prompts/raw_prompts.yml";
pub const DEFAULT_PUSH_INPUT: &str = "prompts/bug_to_user_story_v2.yml";
pub const DEFAULT_LOCALE: &str = "en";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .promptsync/ and prompts/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Registry API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Account namespace prompts are published under
    pub namespace: Option<String>,

    /// Registry API base URL
    pub endpoint: String,

    /// Registry web UI base URL, used to build links to published prompts
    pub web_url: String,

    /// Prompt identifier pulled by default (`owner/name`)
    pub source_prompt: String,

    /// Where `pull` writes the raw prompt draft
    pub pull_output: PathBuf,

    /// Which prompt file `push` publishes
    pub push_input: PathBuf,

    /// Indicator preset used by the validator ("en", "pt")
    pub locale: String,

    /// Optional YAML file overriding validator rules
    pub rules_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Registry credentials resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub namespace: Option<String>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    registry: Option<RegistrySection>,
    prompts: Option<PromptsSection>,
    validation: Option<ValidationSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistrySection {
    endpoint: Option<String>,
    #[serde(rename = "webUrl")]
    web_url: Option<String>,
    namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptsSection {
    source: Option<String>,
    #[serde(rename = "pullOutput")]
    pull_output: Option<PathBuf>,
    #[serde(rename = "pushInput")]
    push_input: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ValidationSection {
    locale: Option<String>,
    #[serde(rename = "rulesFile")]
    rules_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            api_key: None,
            namespace: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            source_prompt: DEFAULT_SOURCE_PROMPT.to_string(),
            pull_output: PathBuf::from(DEFAULT_PULL_OUTPUT),
            push_input: PathBuf::from(DEFAULT_PUSH_INPUT),
            locale: DEFAULT_LOCALE.to_string(),
            rules_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, the config file and the process environment.
    ///
    /// Environment variables:
    /// - `LANGSMITH_API_KEY`: Registry API key
    /// - `USERNAME_LANGSMITH_HUB`: Namespace prompts are published under
    /// - `LANGSMITH_ENDPOINT`: Registry API base URL
    /// - `PROMPTSYNC_WORKSPACE`: Override workspace path
    /// - `PROMPTSYNC_CONFIG`: Path to config file
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use promptsync_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None, None).expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {:?}", path);
        }

        Self::load_with(workspace, config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        lookup: F,
    ) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| var("PROMPTSYNC_WORKSPACE").map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file = config_file.or_else(|| var("PROMPTSYNC_CONFIG").map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.workspace.join(".promptsync/config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Some(endpoint) = var(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }

        if let Some(namespace) = var(NAMESPACE_ENV) {
            config.namespace = Some(namespace);
        }

        config.api_key = var(API_KEY_ENV);

        if let Some(level) = var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(registry) = config_file.registry {
            if let Some(endpoint) = registry.endpoint {
                result.endpoint = endpoint;
            }
            if let Some(web_url) = registry.web_url {
                result.web_url = web_url;
            }
            if registry.namespace.is_some() {
                result.namespace = registry.namespace;
            }
        }

        if let Some(prompts) = config_file.prompts {
            if let Some(source) = prompts.source {
                result.source_prompt = source;
            }
            if let Some(pull_output) = prompts.pull_output {
                result.pull_output = pull_output;
            }
            if let Some(push_input) = prompts.push_input {
                result.push_input = push_input;
            }
        }

        if let Some(validation) = config_file.validation {
            if let Some(locale) = validation.locale {
                result.locale = locale;
            }
            if validation.rules_file.is_some() {
                result.rules_file = validation.rules_file;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve a possibly relative path against the workspace root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Resolve registry credentials.
    ///
    /// Fails before any network I/O if the API key is missing, or if
    /// `require_namespace` is set and the namespace is missing.
    pub fn credentials(&self, require_namespace: bool) -> AppResult<Credentials> {
        let mut missing = Vec::new();

        if self.api_key.is_none() {
            missing.push(API_KEY_ENV);
        }
        if require_namespace && self.namespace.is_none() {
            missing.push(NAMESPACE_ENV);
        }

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Missing required environment variable(s): {}. Set them in your shell or in .env",
                missing.join(", ")
            )));
        }

        Ok(Credentials {
            api_key: self.api_key.clone().unwrap_or_default(),
            namespace: self.namespace.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(dir: &TempDir, vars: &HashMap<String, String>) -> AppResult<AppConfig> {
        AppConfig::load_with(Some(dir.path().to_path_buf()), None, |k| vars.get(k).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.source_prompt, DEFAULT_SOURCE_PROMPT);
        assert_eq!(config.locale, "en");
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_load_reads_credentials_from_env() {
        let dir = TempDir::new().unwrap();
        let vars = env(&[(API_KEY_ENV, "lsv2_key"), (NAMESPACE_ENV, "alice")]);

        let config = load(&dir, &vars).unwrap();
        let creds = config.credentials(true).unwrap();
        assert_eq!(creds.api_key, "lsv2_key");
        assert_eq!(creds.namespace.as_deref(), Some("alice"));
    }

    #[test]
    fn test_empty_env_value_counts_as_missing() {
        let dir = TempDir::new().unwrap();
        let vars = env(&[(API_KEY_ENV, "  ")]);

        let config = load(&dir, &vars).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_credentials_report_every_missing_variable() {
        let config = AppConfig::default();
        let err = config.credentials(true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(API_KEY_ENV));
        assert!(message.contains(NAMESPACE_ENV));
    }

    #[test]
    fn test_namespace_optional_for_pull() {
        let mut config = AppConfig::default();
        config.api_key = Some("key".to_string());
        assert!(config.credentials(false).is_ok());
        assert!(config.credentials(true).is_err());
    }

    #[test]
    fn test_yaml_config_is_merged_and_env_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".promptsync")).unwrap();
        std::fs::write(
            dir.path().join(".promptsync/config.yaml"),
            r#"
registry:
  endpoint: "http://localhost:1984"
  webUrl: "http://localhost:1985"
prompts:
  source: "bob/my_prompt"
  pushInput: "prompts/mine.yml"
validation:
  locale: pt
logging:
  level: warn
  color: false
"#,
        )
        .unwrap();

        let vars = env(&[(ENDPOINT_ENV, "http://override:1984")]);
        let config = load(&dir, &vars).unwrap();

        assert_eq!(config.endpoint, "http://override:1984");
        assert_eq!(config.web_url, "http://localhost:1985");
        assert_eq!(config.source_prompt, "bob/my_prompt");
        assert_eq!(config.push_input, PathBuf::from("prompts/mine.yml"));
        assert_eq!(config.locale, "pt");
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert!(config.no_color);
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = AppConfig::load_with(
            Some(dir.path().to_path_buf()),
            Some(dir.path().join("nope.yaml")),
            |_| None,
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_workspace_is_an_error() {
        let result = AppConfig::load_with(
            Some(PathBuf::from("/definitely/not/here")),
            None,
            |_| None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(None, true, false);
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));

        let config = AppConfig::default().with_overrides(Some("trace".to_string()), true, true);
        assert_eq!(config.log_level, Some("trace".to_string()));
        assert!(config.no_color);
    }

    #[test]
    fn test_resolve_path() {
        let mut config = AppConfig::default();
        config.workspace = PathBuf::from("/work");
        assert_eq!(
            config.resolve_path(Path::new("prompts/a.yml")),
            PathBuf::from("/work/prompts/a.yml")
        );
        assert_eq!(
            config.resolve_path(Path::new("/abs/a.yml")),
            PathBuf::from("/abs/a.yml")
        );
    }
}
