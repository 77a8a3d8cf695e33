//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `.campusstyle/prompts/{name}.pmt` (user override)
//! 2. `prompts/{name}.pmt` (project default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{PlanPromptContext, PromptError, PromptLoader, ShoppingPromptContext};

/// What users see when a prompt template cannot be loaded or rendered
pub const PROMPT_TEMPLATE_MESSAGE: &str =
    "A prompt template could not be used. Check the .pmt files in .campusstyle/prompts/ and prompts/.";
