//! Terminal rendering for plans, suggestions and preferences
//!
//! Everything coming back from the model is shown as plain text: control
//! characters are stripped so a reply cannot drive the terminal.

use colored::Colorize;

use crate::domain::{DailyPlan, Preferences, ShoppingSuggestion, WeeklyPlan};

/// Drop control characters (escape sequences included) from remote text
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

/// Rough weather class of a tip, for the symbol next to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCue {
    Rain,
    Snow,
    Wind,
    Sun,
}

impl WeatherCue {
    /// Classify by keyword; rain beats snow beats wind, anything else is sunny
    pub fn from_tip(tip: &str) -> Self {
        let tip = tip.to_lowercase();
        if tip.contains("rain") || tip.contains("umbrella") {
            Self::Rain
        } else if tip.contains("snow") || tip.contains("cold") {
            Self::Snow
        } else if tip.contains("wind") {
            Self::Wind
        } else {
            Self::Sun
        }
    }

    pub fn symbol(&self) -> colored::ColoredString {
        match self {
            Self::Rain => "☂".blue(),
            Self::Snow => "❄".cyan(),
            Self::Wind => "≋".white(),
            Self::Sun => "☀".yellow(),
        }
    }
}

/// Render one day: header, items with ids, reasoning and weather tip
pub fn render_day(index: usize, day: &DailyPlan) -> String {
    let mut out = String::new();
    let badge = if day.has_college {
        "college".bright_green()
    } else {
        "free".bright_blue()
    };
    out.push_str(&format!("{} {} [{}]\n", format!("{}.", index + 1).dimmed(), day.day.name().bold(), badge));

    if day.outfit_items.is_empty() {
        out.push_str(&format!("   {}\n", "(no items)".dimmed()));
    }
    for item in &day.outfit_items {
        let color = item
            .color
            .as_deref()
            .map(sanitize)
            .filter(|c| !c.trim().is_empty())
            .map(|c| format!(" ({})", c))
            .unwrap_or_default();
        out.push_str(&format!(
            "   {} {:<10} {}{}\n",
            format!("[{}]", sanitize(&item.id)).dimmed(),
            item.item_type.as_str(),
            sanitize(&item.name),
            color
        ));
    }

    out.push_str(&format!("   {} {}\n", "Why:".yellow(), sanitize(&day.reasoning)));
    out.push_str(&format!(
        "   {} {} {}\n",
        "Weather:".cyan(),
        WeatherCue::from_tip(&day.weather_tip).symbol(),
        sanitize(&day.weather_tip)
    ));
    out
}

/// Render the whole week in plan order
pub fn render_plan(plan: &WeeklyPlan) -> String {
    plan.days()
        .iter()
        .enumerate()
        .map(|(i, day)| render_day(i, day))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render lookup results followed by the "view more" link
pub fn render_suggestions(suggestions: &[ShoppingSuggestion], view_more: &str) -> String {
    let mut out = String::new();
    for (i, s) in suggestions.iter().enumerate() {
        let price = s.price.as_deref().map(|p| format!(" - {}", sanitize(p))).unwrap_or_default();
        out.push_str(&format!(
            "{} {} ({}{})\n   {}\n",
            format!("{}.", i + 1).dimmed(),
            sanitize(&s.title).bold(),
            sanitize(&s.source),
            price,
            sanitize(&s.link).underline()
        ));
    }
    out.push_str(&format!("{} {}\n", "View more:".yellow(), view_more));
    out
}

/// Render the current preferences
pub fn render_preferences(prefs: &Preferences) -> String {
    let days = if prefs.college_days.is_empty() {
        "none".to_string()
    } else {
        prefs.college_days.iter().map(|d| d.short()).collect::<Vec<_>>().join(", ")
    };
    let notes = if prefs.additional_instructions.trim().is_empty() {
        "none".to_string()
    } else {
        prefs.additional_instructions.trim().to_string()
    };
    let photo = prefs.photo.as_ref().map(|p| p.mime_type().to_string()).unwrap_or_else(|| "none".to_string());

    [
        ("gender", prefs.gender.label().to_string()),
        ("days", days),
        ("hours", format!("{} to {}", prefs.start_time, prefs.end_time)),
        ("season", prefs.season.label().to_string()),
        ("style", prefs.style.label().to_string()),
        ("notes", notes),
        ("photo", photo),
    ]
    .into_iter()
    .map(|(key, value)| format!("  {:8} {}\n", key.yellow(), value))
    .collect()
}
