//! Mealprep - AI-powered meal planner
//!
//! A CLI tool that asks an LLM for meal ideas, researches each idea on the
//! web, writes complete recipes, and builds one shopping list from them.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing key, API failure, write failure, etc.)

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use mealprep::cli::{Args, OutputFormat};
use mealprep::config::{Config, CONFIG_FILE_NAME};
use mealprep::llm::{LlmClient, LlmConfig, MealPlanner};
use mealprep::models::{Recipe, RunSummary};
use mealprep::report;
use mealprep::search::{ExaClient, SearchConfig};
use mealprep::shopping::build_shopping_list;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is loaded before logging so its verbosity applies
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    init_logging(args.log_level(config.general.verbose));

    info!("Mealprep v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(args, config).await {
        Ok(summary) => {
            debug!("Run summary: {:?}", summary);
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .mealprep.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   API keys are read from OPENAI_API_KEY and EXA_API_KEY.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete workflow: ideas, recipes, files, shopping list.
async fn run(args: Args, config: Config) -> Result<RunSummary> {
    let start_time = Instant::now();

    if let Err(e) = args.require_keys(config.search.enabled) {
        anyhow::bail!(e);
    }

    // Step 1: Get the recipes
    let (ideas, recipes) = match args.from_json {
        Some(ref path) => {
            println!("📂 Loading recipes from {}", path.display());
            (0, report::load_recipes_json(path)?)
        }
        None => fetch_recipes(&args, &config).await?,
    };

    if recipes.is_empty() {
        warn!("No recipes to write");
    }

    // Step 2: Build the shopping list before touching the disk
    let shopping_list = build_shopping_list(&recipes).context("Failed to build shopping list")?;

    // Step 3: Write everything into a fresh folder
    let output_dir = report::create_output_dir(
        Path::new(&config.general.output_dir),
        &config.general.folder_prefix,
        Utc::now().timestamp(),
    )?;

    let written = report::write_recipes(&output_dir, &recipes)?;

    if args.save_json {
        let path = report::write_recipes_json(&output_dir, &recipes)?;
        info!("Saved recipes to {}", path.display());
    }

    let (list_file, content) = match config.general.format {
        OutputFormat::Text => (
            report::SHOPPING_LIST_TEXT,
            report::generate_shopping_list_text(&shopping_list),
        ),
        OutputFormat::Json => (
            report::SHOPPING_LIST_JSON,
            report::generate_shopping_list_json(&shopping_list)?,
        ),
    };
    let list_path = output_dir.join(list_file);
    std::fs::write(&list_path, content)
        .with_context(|| format!("Failed to write shopping list to {}", list_path.display()))?;

    let summary = RunSummary {
        ideas,
        recipes_written: written.len(),
        shopping_items: shopping_list.len(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    println!(
        "\n🛒 Created {} with {} items.",
        list_path.display(),
        summary.shopping_items
    );
    println!(
        "📄 Created {} recipe files in {}",
        summary.recipes_written,
        output_dir.display()
    );
    println!("⏱️  Total execution time: {:.2} seconds", summary.duration_seconds);

    Ok(summary)
}

/// Ask the LLM for ideas, then fetch recipes for all of them at once.
async fn fetch_recipes(args: &Args, config: &Config) -> Result<(usize, Vec<Recipe>)> {
    let llm = LlmClient::new(LlmConfig {
        api_url: config.model.api_url.clone(),
        api_key: args.api_key.clone().unwrap_or_default(),
        model_name: config.model.name.clone(),
        temperature: config.model.temperature,
        timeout_seconds: config.model.timeout_seconds,
    })?;

    let search = if config.search.enabled {
        Some(ExaClient::new(SearchConfig {
            api_url: config.search.api_url.clone(),
            api_key: args.search_key.clone().unwrap_or_default(),
            num_results: config.search.num_results,
            search_type: config.search.search_type.clone(),
            use_autoprompt: config.search.use_autoprompt,
            timeout_seconds: config.model.timeout_seconds,
        })?)
    } else {
        None
    };

    let planner = MealPlanner::new(llm, search);
    let context = args.context.as_deref().unwrap_or_default();

    println!("🤔 Coming up with meal ideas...");
    println!("   Model: {}", config.model.name);
    let ideas = planner.get_meal_ideas(context).await?;

    for idea in &ideas.ideas {
        println!("   • {}", idea);
    }

    println!("\n🍳 Writing recipes for {} ideas...", ideas.ideas.len());
    let spinner = progress_spinner(args.quiet);
    let recipes = planner.get_all_recipes(&ideas.ideas).await;
    spinner.finish_and_clear();
    let recipes = recipes?;

    info!("Generated {} recipes", recipes.len());
    Ok((ideas.ideas.len(), recipes))
}

/// Spinner shown while recipes are fetched.
fn progress_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message("researching and writing recipes");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load {}: {:#}", CONFIG_FILE_NAME, e);
            Ok(Config::default())
        }
    }
}
