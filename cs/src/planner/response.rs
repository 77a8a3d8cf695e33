//! Plan response parser and validator
//!
//! The single trust boundary between the remote model and the typed plan:
//! decode the reply, then check it really is a week.

use tracing::{debug, warn};

use super::PlanError;
use crate::domain::{DailyPlan, WeeklyPlan};

/// Parse the model's raw reply into a validated weekly plan
///
/// Absent or blank text, malformed JSON, a non-array, missing required
/// fields, unknown item types and anything that is not exactly one entry
/// per weekday all fail. No partial plan is ever returned.
pub fn parse_plan(reply: Option<&str>) -> Result<WeeklyPlan, PlanError> {
    let Some(text) = reply.map(str::trim).filter(|t| !t.is_empty()) else {
        debug!("parse_plan: no reply text");
        return Err(PlanError::NoReply);
    };
    debug!(text_len = text.len(), "parse_plan: called");

    let days: Vec<DailyPlan> = serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "parse_plan: reply is not a valid plan array");
        PlanError::Malformed(e)
    })?;

    WeeklyPlan::new(days).map_err(|e| {
        warn!(error = %e, "parse_plan: reply failed plan validation");
        PlanError::Invalid(e)
    })
}
