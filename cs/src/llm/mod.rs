//! Generative model client module
//!
//! Provides the client trait, the Gemini implementation and the shared
//! request/response types.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::GenAiClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{GenerateRequest, GenerateResponse, GroundingCitation, Part, Tool};

use crate::config::LlmConfig;

/// Create the configured client
///
/// Fails fast when the API key cannot be resolved.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn GenAiClient>, LlmError> {
    debug!(model = %config.model, "create_client: called");
    Ok(Arc::new(GeminiClient::from_config(config)?))
}
