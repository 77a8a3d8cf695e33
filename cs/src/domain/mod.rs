//! Domain types for CampusStyle
//!
//! Preferences go in, a `WeeklyPlan` comes out, and `ShoppingSuggestion`s
//! hang off individual outfit items.

use std::path::PathBuf;

use thiserror::Error;

mod id;
mod plan;
mod preferences;
mod shopping;

pub use id::generate_item_id;
pub use plan::{DailyPlan, EditError, ItemType, OutfitItem, PlanShapeError, WeeklyPlan};
pub use preferences::{ClockTime, Gender, Photo, Preferences, Season, StylePreference, Weekday};
pub use shopping::ShoppingSuggestion;

/// Rejected user input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error("Unknown gender: {0} (expected male, female, non-binary or unisex)")]
    UnknownGender(String),

    #[error("Unknown season: {0} (expected spring, summer, autumn or winter)")]
    UnknownSeason(String),

    #[error("Unknown style: {0} (expected casual, chic, formal, streetwear, minimalist or vintage)")]
    UnknownStyle(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Unsupported image: {0} (expected png, jpeg or webp)")]
    UnsupportedImage(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Failed to read photo {path}: {source}")]
    PhotoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
