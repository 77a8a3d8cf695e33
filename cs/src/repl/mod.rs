//! Interactive session for CampusStyle
//!
//! A terminal stand-in for the plan page: generate a week, tweak items and
//! look up where to buy them, all held in memory for the session.

mod render;
mod session;
mod state;

pub use render::{WeatherCue, render_plan, render_preferences, render_suggestions, sanitize};
pub use session::{DaySelector, ReplSession, SlashCommand, SlashResult, apply_setting, parse_command};
pub use state::{AppState, LookupStatus, LookupSurface, LookupTicket, StateError};

use std::sync::Arc;

use eyre::{Result, eyre};
use tracing::info;

use crate::config::Config;
use crate::domain::Preferences;
use crate::llm::create_client;
use crate::planner::Planner;
use crate::prompts::PromptLoader;
use crate::shopping::ShoppingLookup;

/// Run the interactive session
///
/// This is the main entry point for `cs session`.
pub async fn run_interactive(config: &Config, prefs: Preferences) -> Result<()> {
    let client = create_client(&config.llm).map_err(|e| eyre!("Failed to create client: {}", e))?;
    let prompts = Arc::new(PromptLoader::new(std::env::current_dir()?));

    let planner = Planner::new(client.clone(), prompts.clone());
    let shopping = ShoppingLookup::new(client, prompts, config.shopping.search_url.clone());

    info!(model = %config.llm.model, "Starting interactive session");
    let mut session = ReplSession::new(planner, shopping, prefs);
    session.run().await
}
