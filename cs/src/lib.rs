//! CampusStyle - weekly outfit planner for college students
//!
//! Collects a student's schedule and style preferences, asks a generative
//! model for a 7-day outfit plan, validates the reply into a typed plan, and
//! lets the student tweak items or look up where to buy them.
//!
//! # Core Concepts
//!
//! - **Strict trust boundary**: the model's reply is decoded and validated
//!   before it becomes a `WeeklyPlan`; anything short of a full week fails
//! - **One message for users**: failure causes go to the log, users see a
//!   single retryable message
//! - **Memory only**: plans live for the session and are never persisted
//!
//! # Modules
//!
//! - [`domain`] - Preferences, plans, outfit items and shopping suggestions
//! - [`llm`] - Generative client trait and Gemini implementation
//! - [`prompts`] - Handlebars prompt templates
//! - [`planner`] - Plan request builder, reply parser and the planner service
//! - [`shopping`] - Shopping lookup adapter
//! - [`repl`] - Interactive session, presentation state and rendering
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod repl;
pub mod shopping;

pub use config::Config;
pub use domain::{DailyPlan, OutfitItem, Preferences, ShoppingSuggestion, WeeklyPlan};
pub use llm::{GenAiClient, LlmError};
pub use planner::{PlanError, Planner};
pub use shopping::{ShoppingError, ShoppingLookup};
