//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{ClockTime, Gender, InputError, Photo, Preferences, Season, StylePreference, Weekday};

/// CampusStyle - weekly outfit planner for college students
#[derive(Parser)]
#[command(
    name = "cs",
    about = "Plan a week of college outfits and find where to buy them",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/campusstyle/logs/campusstyle.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a weekly outfit plan and print it
    Plan {
        #[command(flatten)]
        prefs: PrefArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find shopping links for an item description
    Shop {
        /// Item description, e.g. "navy pleated skirt"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Start an interactive planning session
    Session {
        #[command(flatten)]
        prefs: PrefArgs,
    },
}

/// Style profile flags shared by `plan` and `session`
#[derive(Debug, Clone, Args)]
pub struct PrefArgs {
    /// Gender the outfits are styled for (male, female, non-binary, unisex)
    #[arg(long, default_value = "female")]
    pub gender: Gender,

    /// College days, comma separated (e.g. mon,tue,thu); defaults to Monday-Friday
    #[arg(long, value_delimiter = ',', conflicts_with = "no_college")]
    pub days: Option<Vec<Weekday>>,

    /// No college days this week
    #[arg(long)]
    pub no_college: bool,

    /// First class starts (HH:MM)
    #[arg(long, default_value = "09:00")]
    pub start: ClockTime,

    /// Last class ends (HH:MM)
    #[arg(long, default_value = "16:00")]
    pub end: ClockTime,

    /// Season (spring, summer, autumn, winter)
    #[arg(long, default_value = "spring")]
    pub season: Season,

    /// Style (casual, chic, formal, streetwear, minimalist, vintage)
    #[arg(long, default_value = "casual")]
    pub style: StylePreference,

    /// Anything else the stylist should know
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Photo of yourself (png, jpg, webp) or a data URL
    #[arg(long)]
    pub photo: Option<String>,
}

impl PrefArgs {
    /// Build preferences, reading the photo if one was given
    pub async fn into_preferences(self) -> Result<Preferences, InputError> {
        debug!(?self.days, no_college = self.no_college, "PrefArgs::into_preferences: called");
        let mut prefs = Preferences {
            gender: self.gender,
            start_time: self.start,
            end_time: self.end,
            season: self.season,
            style: self.style,
            additional_instructions: self.notes,
            ..Default::default()
        };

        if self.no_college {
            prefs.college_days.clear();
        } else if let Some(days) = self.days {
            prefs.college_days = days.into_iter().collect();
        }

        if let Some(source) = self.photo {
            prefs.photo = Some(Photo::open(&source).await?);
        }
        Ok(prefs)
    }
}

/// Output format for plan/shop commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Where the log file lives
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("campusstyle")
        .join("logs")
        .join("campusstyle.log")
}
