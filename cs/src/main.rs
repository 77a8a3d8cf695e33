//! CampusStyle - weekly outfit planner
//!
//! CLI entry point for generating plans, looking up items and running the
//! interactive session.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result, eyre};
use tracing::{debug, error, info};

use campusstyle::cli::{Cli, Command, OutputFormat, PrefArgs, get_log_path};
use campusstyle::config::Config;
use campusstyle::domain::Preferences;
use campusstyle::llm::create_client;
use campusstyle::planner::Planner;
use campusstyle::prompts::PromptLoader;
use campusstyle::repl::{render_plan, render_suggestions};
use campusstyle::shopping::ShoppingLookup;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!(path = %log_path.display(), "Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(model = %config.llm.model, "CampusStyle loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Plan { prefs, format }) => cmd_plan(&config, prefs, format).await,
        Some(Command::Shop { query, format }) => cmd_shop(&config, &query.join(" "), format).await,
        Some(Command::Session { prefs }) => cmd_session(&config, prefs.into_preferences().await?).await,
        None => {
            debug!("main: no command, starting session with defaults");
            cmd_session(&config, Preferences::default()).await
        }
    }
}

fn prompt_loader() -> Result<Arc<PromptLoader>> {
    Ok(Arc::new(PromptLoader::new(std::env::current_dir()?)))
}

/// Generate a plan and print it
async fn cmd_plan(config: &Config, args: PrefArgs, format: OutputFormat) -> Result<()> {
    config.validate()?;
    let prefs = args.into_preferences().await?;

    let client = create_client(&config.llm)?;
    let planner = Planner::new(client, prompt_loader()?);

    let plan = match planner.generate_weekly_plan(&prefs).await {
        Ok(plan) => plan,
        Err(e) => {
            error!(error = %e, "cmd_plan: generation failed");
            return Err(eyre!(e.user_message()));
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => println!("{}", render_plan(&plan)),
    }
    Ok(())
}

/// Look up shopping links for a description
async fn cmd_shop(config: &Config, query: &str, format: OutputFormat) -> Result<()> {
    config.validate()?;

    let client = create_client(&config.llm)?;
    let lookup = ShoppingLookup::new(client, prompt_loader()?, config.shopping.search_url.clone());

    let suggestions = match lookup.lookup(query).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            error!(error = %e, "cmd_shop: lookup failed");
            return Err(eyre!(e.user_message()));
        }
    };

    let view_more = lookup.view_more_url(query);
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "query": query,
                "suggestions": suggestions,
                "viewMore": view_more,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => print!("{}", render_suggestions(&suggestions, &view_more)),
    }
    Ok(())
}

/// Run the interactive session
async fn cmd_session(config: &Config, prefs: Preferences) -> Result<()> {
    config.validate()?;
    campusstyle::repl::run_interactive(config, prefs).await
}
