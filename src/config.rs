//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.mealprep.toml` files. API keys are never stored here; they come from
//! the command line or the environment.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".mealprep.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Web search settings.
    #[serde(default)]
    pub search: SearchSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory in which run folders are created.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Prefix of each run folder name.
    #[serde(default = "default_folder_prefix")]
    pub folder_prefix: String,

    /// Shopping list output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            folder_prefix: default_folder_prefix(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_folder_prefix() -> String {
    "recipes".to_string()
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            api_url: default_api_url(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    120
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Search the web for each meal idea before generating recipes.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the Exa API.
    #[serde(default = "default_search_url")]
    pub api_url: String,

    /// Results to request per idea.
    #[serde(default = "default_num_results")]
    pub num_results: usize,

    /// Exa search type ("neural", "keyword" or "auto").
    #[serde(default = "default_search_type")]
    pub search_type: String,

    /// Let Exa rewrite the query.
    #[serde(default = "default_true")]
    pub use_autoprompt: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_search_url(),
            num_results: default_num_results(),
            search_type: default_search_type(),
            use_autoprompt: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_search_url() -> String {
    "https://api.exa.ai".to_string()
}

fn default_num_results() -> usize {
    5
}

fn default_search_type() -> String {
    "neural".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(ref api_url) = args.api_url {
            self.model.api_url = api_url.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        if let Some(ref search_url) = args.search_url {
            self.search.api_url = search_url.clone();
        }
        if let Some(num_results) = args.num_results {
            self.search.num_results = num_results;
        }
        if args.no_search {
            self.search.enabled = false;
        }

        if let Some(ref output_dir) = args.output_dir {
            self.general.output_dir = output_dir.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Validate the merged configuration.
    ///
    /// Values from the file never pass through clap, so ranges are checked
    /// again here before anything is sent to the APIs.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [
            ("model.api_url", &self.model.api_url),
            ("search.api_url", &self.search.api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!(
                    "{} must start with 'http://' or 'https://': {}",
                    name, url
                ));
            }
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(format!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            ));
        }

        if self.model.timeout_seconds == 0 {
            return Err("model.timeout_seconds must be at least 1".to_string());
        }

        if self.search.num_results == 0 {
            return Err("search.num_results must be at least 1".to_string());
        }

        if self.general.folder_prefix.trim().is_empty() {
            return Err("general.folder_prefix must not be empty".to_string());
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
