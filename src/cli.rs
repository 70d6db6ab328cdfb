//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Mealprep - LLM-powered meal planner
///
/// Turns a description of what you want to eat into meal ideas, complete
/// recipes (researched on the web), and one consolidated shopping list.
///
/// Examples:
///   mealprep --context "High protein, I like chicken and greek yogurt"
///   mealprep --context "Cheap vegetarian lunches" --no-search --format json
///   mealprep --from-json recipes_1700000000/recipes.json
///   mealprep --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// What you want to eat, in your own words
    #[arg(
        short = 'x',
        long,
        value_name = "TEXT",
        env = "MEALPREP_CONTEXT",
        required_unless_present_any = ["init_config", "from_json"]
    )]
    pub context: Option<String>,

    /// Model to use for ideas and recipes
    ///
    /// Default: from config or gpt-4o-mini.
    #[arg(short, long, env = "MEALPREP_MODEL")]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible chat completions API
    #[arg(long, value_name = "URL", env = "OPENAI_BASE_URL")]
    pub api_url: Option<String>,

    /// API key for the LLM provider
    #[arg(long, value_name = "KEY", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Exa search API
    #[arg(long, value_name = "URL")]
    pub search_url: Option<String>,

    /// API key for Exa search
    #[arg(long, value_name = "KEY", env = "EXA_API_KEY", hide_env_values = true)]
    pub search_key: Option<String>,

    /// Search results to use as research for each meal idea
    #[arg(long, value_name = "COUNT")]
    pub num_results: Option<usize>,

    /// Generate recipes without searching the web first
    #[arg(long)]
    pub no_search: bool,

    /// Temperature for LLM responses (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory in which the run folder is created
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Shopping list format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Build recipe files and the shopping list from saved recipes
    ///
    /// Reads a JSON array of recipes (as written by --save-json) and
    /// makes no API calls.
    #[arg(long, value_name = "FILE")]
    pub from_json: Option<PathBuf>,

    /// Also save all recipes as recipes.json in the run folder
    #[arg(long)]
    pub save_json: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .mealprep.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .mealprep.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the shopping list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text SHOPPINGLIST.txt (default)
    #[default]
    Text,
    /// JSON shopping_list.json
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref context) = self.context {
            if context.trim().is_empty() {
                return Err("Context must not be empty".to_string());
            }
        }

        for (flag, url) in [("--api-url", &self.api_url), ("--search-url", &self.search_url)] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(format!(
                        "{} must start with 'http://' or 'https://': {}",
                        flag, url
                    ));
                }
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if self.num_results == Some(0) {
            return Err("Number of search results must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref path) = self.from_json {
            if !path.is_file() {
                return Err(format!("Recipes file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Check that the API keys needed for this run are present.
    pub fn require_keys(&self, search_enabled: bool) -> Result<(), String> {
        if self.from_json.is_some() {
            return Ok(());
        }

        if self.api_key.as_deref().map_or(true, str::is_empty) {
            return Err("An LLM API key is required (--api-key or OPENAI_API_KEY)".to_string());
        }

        if search_enabled && self.search_key.as_deref().map_or(true, str::is_empty) {
            return Err(
                "An Exa API key is required (--search-key or EXA_API_KEY), or pass --no-search"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `--quiet` wins over verbosity from either the flag or the config file.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            context: Some("I need more protein".to_string()),
            model: None,
            api_url: None,
            api_key: Some("sk-test".to_string()),
            search_url: None,
            search_key: Some("exa-test".to_string()),
            num_results: None,
            no_search: false,
            temperature: None,
            timeout: None,
            output_dir: None,
            format: None,
            from_json: None,
            save_json: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.api_url = Some("api.openai.com".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_names_failing_flag() {
        let mut args = make_args();
        args.search_url = Some("api.exa.ai".to_string());
        let err = args.validate().unwrap_err();
        assert!(err.starts_with("--search-url"), "{}", err);

        let mut args = make_args();
        args.api_url = Some("ftp://example.com".to_string());
        let err = args.validate().unwrap_err();
        assert!(err.starts_with("--api-url"), "{}", err);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_ranges() {
        let mut args = make_args();
        args.temperature = Some(2.5);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.num_results = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.context = Some("   ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_recipes_file() {
        let mut args = make_args();
        args.from_json = Some(PathBuf::from("/definitely/not/here.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_require_keys() {
        let mut args = make_args();
        assert!(args.require_keys(true).is_ok());

        args.search_key = None;
        assert!(args.require_keys(true).is_err());
        assert!(args.require_keys(false).is_ok());

        args.api_key = Some(String::new());
        assert!(args.require_keys(false).is_err());

        args.from_json = Some(PathBuf::from("recipes.json"));
        assert!(args.require_keys(true).is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_follows_config_verbose() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "mealprep",
            "--context",
            "tacos",
            "--no-search",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.context.as_deref(), Some("tacos"));
        assert!(args.no_search);
        assert_eq!(args.format, Some(OutputFormat::Json));
    }
}
