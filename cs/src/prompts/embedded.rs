//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Weekly outfit plan instructions
pub const WEEKLY_PLAN: &str = include_str!("../../prompts/weekly-plan.pmt");

/// Extra instructions sent after the student's photo
pub const PHOTO_ANALYSIS: &str = include_str!("../../prompts/photo-analysis.pmt");

/// Search-grounded shopping query
pub const SHOPPING: &str = include_str!("../../prompts/shopping.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "weekly-plan" => Some(WEEKLY_PLAN),
        "photo-analysis" => Some(PHOTO_ANALYSIS),
        "shopping" => Some(SHOPPING),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
