//! Weekly plan generation
//!
//! Preferences → request → remote model → validated `WeeklyPlan`.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

mod request;
mod response;

pub use request::{build_plan_request, plan_prompt_context, plan_response_schema};
pub use response::parse_plan;

use crate::domain::{PlanShapeError, Preferences, WeeklyPlan};
use crate::llm::{GenAiClient, LlmError};
use crate::prompts::{PROMPT_TEMPLATE_MESSAGE, PromptError, PromptLoader};

/// The one message users see for any generation failure
pub const GENERATION_FAILED_MESSAGE: &str = "Something went wrong while generating your plan. Please try again.";

/// Why plan generation failed
///
/// The variants are for logs; users only ever see `user_message()`. A broken
/// template override is a local configuration problem and says so; every
/// other cause gets the generic retry message.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to build plan request: {0}")]
    Prompt(#[from] PromptError),

    #[error("Plan request failed: {0}")]
    Remote(#[from] LlmError),

    #[error("No response from the model")]
    NoReply,

    #[error("Model reply is not a valid plan: {0}")]
    Malformed(serde_json::Error),

    #[error("Model reply is not a complete week: {0}")]
    Invalid(PlanShapeError),
}

impl PlanError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Prompt(_) => PROMPT_TEMPLATE_MESSAGE,
            _ => GENERATION_FAILED_MESSAGE,
        }
    }
}

/// Generates weekly plans through a generative client
pub struct Planner {
    client: Arc<dyn GenAiClient>,
    prompts: Arc<PromptLoader>,
}

impl Planner {
    pub fn new(client: Arc<dyn GenAiClient>, prompts: Arc<PromptLoader>) -> Self {
        debug!("Planner::new: called");
        Self { client, prompts }
    }

    /// Request a plan for these preferences
    ///
    /// One remote call, no retries. The photo, if any, is attached to this
    /// request only.
    pub async fn generate_weekly_plan(&self, prefs: &Preferences) -> Result<WeeklyPlan, PlanError> {
        info!(
            gender = %prefs.gender,
            college_days = prefs.college_days.len(),
            season = %prefs.season,
            style = %prefs.style,
            has_photo = prefs.photo.is_some(),
            "Generating weekly plan"
        );
        let request = build_plan_request(&self.prompts, prefs)?;

        let response = self.client.generate(request).await.map_err(|e| {
            warn!(error = %e, "generate_weekly_plan: remote call failed");
            PlanError::Remote(e)
        })?;

        let plan = parse_plan(response.text.as_deref())?;
        info!(
            items = plan.days().iter().map(|d| d.outfit_items.len()).sum::<usize>(),
            "Weekly plan generated"
        );
        Ok(plan)
    }
}
