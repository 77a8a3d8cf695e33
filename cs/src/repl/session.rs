//! REPL session management

use std::collections::BTreeSet;

use colored::Colorize;
use eyre::{Result, eyre};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use super::render::{render_plan, render_preferences, render_suggestions, sanitize};
use super::state::{AppState, LookupStatus};
use crate::domain::{Photo, Preferences, WeeklyPlan, Weekday};
use crate::planner::Planner;
use crate::shopping::{ShoppingLookup, query_for_item};

/// A day given on the command line: `3` or `wed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelector {
    /// Zero-based position in the plan
    Index(usize),
    Day(Weekday),
}

impl DaySelector {
    pub fn parse(s: &str) -> Result<Self> {
        if let Ok(n) = s.parse::<usize>() {
            if (1..=7).contains(&n) {
                return Ok(Self::Index(n - 1));
            }
            return Err(eyre!("Day number must be between 1 and 7, got {}", n));
        }
        Ok(Self::Day(s.parse()?))
    }

    /// Position of this day in the plan
    pub fn resolve(&self, plan: &WeeklyPlan) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Day(day) => plan.position_of(*day),
        }
    }
}

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Quit,
    Plan,
    Show,
    Prefs,
    Dismiss,
    Reset,
    Add { day: DaySelector, name: String },
    Remove { day: DaySelector, id: String },
    Shop { day: DaySelector, id: String },
    Set { field: String, value: String },
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

/// Parse one input line starting with `/`
pub fn parse_command(input: &str) -> Result<SlashCommand> {
    let (cmd, rest) = split_word(input);
    debug!(%cmd, "parse_command: called");

    let day_and_rest = |usage: &str| -> Result<(DaySelector, String)> {
        let (day, tail) = split_word(rest);
        if day.is_empty() || tail.is_empty() {
            return Err(eyre!("Usage: {}", usage));
        }
        Ok((DaySelector::parse(day)?, tail.to_string()))
    };

    let command = match cmd {
        "/help" | "/h" => SlashCommand::Help,
        "/quit" | "/q" | "/exit" => SlashCommand::Quit,
        "/plan" | "/p" => SlashCommand::Plan,
        "/show" | "/s" => SlashCommand::Show,
        "/prefs" => SlashCommand::Prefs,
        "/dismiss" => SlashCommand::Dismiss,
        "/reset" => SlashCommand::Reset,
        "/add" => {
            let (day, name) = day_and_rest("/add <day> <item name>")?;
            SlashCommand::Add { day, name }
        }
        "/remove" | "/rm" => {
            let (day, id) = day_and_rest("/remove <day> <item id>")?;
            SlashCommand::Remove { day, id }
        }
        "/shop" => {
            let (day, id) = day_and_rest("/shop <day> <item id>")?;
            SlashCommand::Shop { day, id }
        }
        "/set" => {
            let (field, value) = split_word(rest);
            if field.is_empty() {
                return Err(eyre!("Usage: /set <field> <value>"));
            }
            SlashCommand::Set {
                field: field.to_lowercase(),
                value: value.to_string(),
            }
        }
        _ => return Err(eyre!("Unknown command: {}", cmd)),
    };
    Ok(command)
}

/// Change one preference field from text
///
/// `days`, `notes` and `photo` accept `none` to clear.
pub async fn apply_setting(prefs: &mut Preferences, field: &str, value: &str) -> Result<()> {
    debug!(%field, "apply_setting: called");
    let cleared = value.is_empty() || value.eq_ignore_ascii_case("none");
    match field {
        "gender" => prefs.gender = value.parse()?,
        "season" => prefs.season = value.parse()?,
        "style" => prefs.style = value.parse()?,
        "start" => prefs.start_time = value.parse()?,
        "end" => prefs.end_time = value.parse()?,
        "days" if cleared => prefs.college_days.clear(),
        "days" => {
            prefs.college_days = value
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::parse::<Weekday>)
                .collect::<Result<BTreeSet<_>, _>>()?;
        }
        "toggle" => prefs.toggle_day(value.parse()?),
        "notes" if cleared => prefs.additional_instructions.clear(),
        "notes" => prefs.additional_instructions = value.to_string(),
        "photo" if cleared => prefs.photo = None,
        "photo" => prefs.photo = Some(Photo::open(value).await?),
        _ => {
            return Err(eyre!(
                "Unknown field: {} (gender, days, toggle, start, end, season, style, notes, photo)",
                field
            ));
        }
    }
    Ok(())
}

/// Interactive REPL session
pub struct ReplSession {
    planner: Planner,
    shopping: ShoppingLookup,
    prefs: Preferences,
    state: AppState,
}

impl ReplSession {
    pub fn new(planner: Planner, shopping: ShoppingLookup, prefs: Preferences) -> Self {
        Self {
            planner,
            shopping,
            prefs,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if !input.starts_with('/') {
                        println!("Commands start with {}. Type {} for help.", "/".yellow(), "/help".yellow());
                        continue;
                    }

                    match parse_command(input) {
                        Ok(command) => {
                            if let SlashResult::Quit = self.execute(command).await {
                                break;
                            }
                        }
                        Err(e) => println!("{} {}", "?".yellow(), e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Run one command against the session
    pub async fn execute(&mut self, command: SlashCommand) -> SlashResult {
        debug!(?command, "ReplSession::execute: called");
        match command {
            SlashCommand::Help => self.print_help(),
            SlashCommand::Quit => return SlashResult::Quit,
            SlashCommand::Plan => self.generate().await,
            SlashCommand::Show => self.print_plan(),
            SlashCommand::Prefs => print!("{}", render_preferences(&self.prefs)),
            SlashCommand::Dismiss => self.state.dismiss_error(),
            SlashCommand::Reset => {
                self.state.reset();
                println!("{}", "Plan cleared.".dimmed());
            }
            SlashCommand::Add { day, name } => self.add_item(day, &name),
            SlashCommand::Remove { day, id } => self.remove_item(day, &id),
            SlashCommand::Shop { day, id } => self.shop(day, &id).await,
            SlashCommand::Set { field, value } => match apply_setting(&mut self.prefs, &field, &value).await {
                Ok(()) => print!("{}", render_preferences(&self.prefs)),
                Err(e) => println!("{} {}", "Error:".red(), e),
            },
        }
        SlashResult::Continue
    }

    async fn generate(&mut self) {
        if let Err(e) = self.state.begin_generation() {
            println!("{} {}", "Error:".red(), e);
            return;
        }
        println!("{}", "Designing your week...".dimmed());

        let result = self.planner.generate_weekly_plan(&self.prefs).await;
        self.state.finish_generation(result);

        if let Some(message) = self.state.error() {
            println!("{} {} {}", "Error:".red(), message, "(/dismiss to clear)".dimmed());
        } else {
            info!("ReplSession: plan ready");
            self.print_plan();
        }
    }

    fn day_index(&self, day: DaySelector) -> Option<usize> {
        self.state.plan().and_then(|plan| day.resolve(plan))
    }

    fn add_item(&mut self, day: DaySelector, name: &str) {
        let index = self.day_index(day).unwrap_or(usize::MAX);
        match self.state.add_item(index, name) {
            Ok(item) => println!("Added {} {}", format!("[{}]", item.id).dimmed(), sanitize(&item.name)),
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    fn remove_item(&mut self, day: DaySelector, id: &str) {
        let index = self.day_index(day).unwrap_or(usize::MAX);
        match self.state.remove_item(index, id) {
            Ok(Some(item)) => println!("Removed {}", sanitize(&item.name)),
            Ok(None) => println!("{} No item with id {}", "?".yellow(), id),
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    async fn shop(&mut self, day: DaySelector, id: &str) {
        let item = self
            .state
            .plan()
            .zip(self.day_index(day))
            .and_then(|(plan, index)| plan.find_item(index, id));
        let Some(item) = item else {
            println!("{} No item with id {} on that day", "?".yellow(), id);
            return;
        };

        let query = query_for_item(item);
        let ticket = self.state.open_lookup(&query);
        println!("{} {}", "Searching for".dimmed(), sanitize(&query));

        let result = self.shopping.lookup(&query).await;
        self.state.complete_lookup(ticket, result);

        let view_more = self.shopping.view_more_url(&query);
        if let Some(surface) = self.state.lookup() {
            match &surface.status {
                LookupStatus::Ready(suggestions) => print!("{}", render_suggestions(suggestions, &view_more)),
                LookupStatus::Failed(message) => {
                    println!("{} {}", "Error:".red(), message);
                    println!("{} {}", "View more:".yellow(), view_more);
                }
                LookupStatus::Loading => {}
            }
        }
        self.state.close_lookup();
    }

    fn print_plan(&self) {
        match self.state.plan() {
            Some(plan) => println!("{}", render_plan(plan)),
            None => println!("{}", "No plan yet. Use /plan to generate one.".dimmed()),
        }
        if let Some(message) = self.state.error() {
            println!("{} {}", "Error:".red(), message);
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "CampusStyle".bright_cyan().bold());
        print!("{}", render_preferences(&self.prefs));
        println!("Type {} to generate, {} for help, {} to quit", "/plan".yellow(), "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:24} Generate a weekly plan", "/plan".yellow());
        println!("  {:24} Show the current plan", "/show".yellow());
        println!("  {:24} Add an item to a day", "/add <day> <name>".yellow());
        println!("  {:24} Remove an item from a day", "/remove <day> <id>".yellow());
        println!("  {:24} Find shopping links for an item", "/shop <day> <id>".yellow());
        println!("  {:24} Change a preference", "/set <field> <value>".yellow());
        println!("  {:24} Show preferences", "/prefs".yellow());
        println!("  {:24} Clear the error message", "/dismiss".yellow());
        println!("  {:24} Clear the plan", "/reset".yellow());
        println!("  {:24} Show this help", "/help".yellow());
        println!("  {:24} Exit", "/quit".yellow());
        println!();
        println!("Days are names (mon, Tuesday) or plan positions 1-7.");
        println!();
    }
}

/// Result of handling a slash command
#[derive(Debug, PartialEq, Eq)]
pub enum SlashResult {
    Continue,
    Quit,
}
