//! Presentation state
//!
//! What the front-end holds between user actions: the current plan, whether a
//! generation is in flight, the dismissible error line and the shopping
//! lookup surface.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{EditError, OutfitItem, ShoppingSuggestion, WeeklyPlan};
use crate::planner::PlanError;
use crate::shopping::ShoppingError;

/// Rejected front-end action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("A plan is already being generated")]
    Busy,

    #[error("No plan yet - generate one first")]
    NoPlan,

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Identifies one opened lookup surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupTicket(u64);

/// What the lookup surface currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStatus {
    Loading,
    Ready(Vec<ShoppingSuggestion>),
    Failed(String),
}

/// The open shopping lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSurface {
    pub ticket: LookupTicket,
    pub query: String,
    pub status: LookupStatus,
}

/// Front-end state
#[derive(Debug, Default)]
pub struct AppState {
    plan: Option<WeeklyPlan>,
    loading: bool,
    error: Option<String>,
    lookup: Option<LookupSurface>,
    next_ticket: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> Option<&WeeklyPlan> {
        self.plan.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Latest failure message, if not dismissed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn lookup(&self) -> Option<&LookupSurface> {
        self.lookup.as_ref()
    }

    /// Enter the loading state for a new submission
    ///
    /// Only one generation may be in flight; clears the previous error.
    pub fn begin_generation(&mut self) -> Result<(), StateError> {
        debug!(loading = self.loading, "AppState::begin_generation: called");
        if self.loading {
            return Err(StateError::Busy);
        }
        self.loading = true;
        self.error = None;
        Ok(())
    }

    /// Apply the outcome of a generation
    ///
    /// Success replaces the plan atomically. Failure keeps whatever plan was
    /// there and shows the generic message.
    pub fn finish_generation(&mut self, result: Result<WeeklyPlan, PlanError>) {
        self.loading = false;
        match result {
            Ok(plan) => {
                info!("AppState: plan replaced");
                self.plan = Some(plan);
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "AppState: plan generation failed");
                self.error = Some(e.user_message().to_string());
            }
        }
    }

    /// Drop the plan and any error, back to the empty form
    pub fn reset(&mut self) {
        debug!("AppState::reset: called");
        self.plan = None;
        self.error = None;
        self.lookup = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn add_item(&mut self, day_index: usize, name: &str) -> Result<OutfitItem, StateError> {
        let plan = self.plan.as_mut().ok_or(StateError::NoPlan)?;
        Ok(plan.add_item(day_index, name)?)
    }

    pub fn remove_item(&mut self, day_index: usize, item_id: &str) -> Result<Option<OutfitItem>, StateError> {
        let plan = self.plan.as_mut().ok_or(StateError::NoPlan)?;
        Ok(plan.remove_item(day_index, item_id)?)
    }

    /// Open the lookup surface for a query, replacing any open one
    pub fn open_lookup(&mut self, query: impl Into<String>) -> LookupTicket {
        self.next_ticket += 1;
        let ticket = LookupTicket(self.next_ticket);
        let query = query.into();
        debug!(?ticket, %query, "AppState::open_lookup: called");
        self.lookup = Some(LookupSurface {
            ticket,
            query,
            status: LookupStatus::Loading,
        });
        ticket
    }

    /// Apply a finished lookup
    ///
    /// Results for a surface that has since been closed or replaced are
    /// discarded. Returns whether the result was applied.
    pub fn complete_lookup(
        &mut self,
        ticket: LookupTicket,
        result: Result<Vec<ShoppingSuggestion>, ShoppingError>,
    ) -> bool {
        let Some(surface) = self.lookup.as_mut().filter(|s| s.ticket == ticket) else {
            debug!(?ticket, "AppState::complete_lookup: stale result discarded");
            return false;
        };

        surface.status = match result {
            Ok(suggestions) => LookupStatus::Ready(suggestions),
            Err(e) => {
                warn!(error = %e, "AppState: shopping lookup failed");
                LookupStatus::Failed(e.user_message().to_string())
            }
        };
        true
    }

    pub fn close_lookup(&mut self) {
        self.lookup = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyPlan, Weekday};
    use crate::llm::LlmError;
    use crate::planner::GENERATION_FAILED_MESSAGE;
    use crate::shopping::LOOKUP_FAILED_MESSAGE;

    fn plan(reasoning: &str) -> WeeklyPlan {
        let days = Weekday::ALL
            .into_iter()
            .map(|day| DailyPlan {
                day,
                has_college: false,
                outfit_items: vec![],
                reasoning: reasoning.to_string(),
                weather_tip: String::new(),
            })
            .collect();
        WeeklyPlan::new(days).unwrap()
    }

    fn suggestion(link: &str) -> ShoppingSuggestion {
        ShoppingSuggestion {
            title: "Scarf".to_string(),
            link: link.to_string(),
            source: "Google Search".to_string(),
            price: None,
            thumbnail: None,
        }
    }

    #[test]
    fn test_generation_success() {
        let mut state = AppState::new();
        state.begin_generation().unwrap();
        assert!(state.is_loading());

        state.finish_generation(Ok(plan("first")));
        assert!(!state.is_loading());
        assert_eq!(state.plan().unwrap().days()[0].reasoning, "first");
        assert!(state.error().is_none());
    }

    #[test]
    fn test_only_one_generation_in_flight() {
        let mut state = AppState::new();
        state.begin_generation().unwrap();
        assert_eq!(state.begin_generation(), Err(StateError::Busy));
    }

    #[test]
    fn test_generation_failure_keeps_previous_plan() {
        let mut state = AppState::new();
        state.begin_generation().unwrap();
        state.finish_generation(Ok(plan("kept")));

        state.begin_generation().unwrap();
        state.finish_generation(Err(PlanError::NoReply));

        assert!(!state.is_loading());
        assert_eq!(state.error(), Some(GENERATION_FAILED_MESSAGE));
        assert_eq!(state.plan().unwrap().days()[0].reasoning, "kept");

        state.dismiss_error();
        assert!(state.error().is_none());
    }

    #[test]
    fn test_begin_generation_clears_error() {
        let mut state = AppState::new();
        state.begin_generation().unwrap();
        state.finish_generation(Err(PlanError::NoReply));
        state.begin_generation().unwrap();
        assert!(state.error().is_none());
    }

    #[test]
    fn test_edits_need_a_plan() {
        let mut state = AppState::new();
        assert_eq!(state.add_item(0, "Hat"), Err(StateError::NoPlan));
        assert_eq!(state.remove_item(0, "x"), Err(StateError::NoPlan));

        state.begin_generation().unwrap();
        state.finish_generation(Ok(plan("p")));
        let item = state.add_item(0, "Hat").unwrap();
        assert_eq!(state.remove_item(0, &item.id).unwrap(), Some(item));
        assert_eq!(state.add_item(0, ""), Err(StateError::Edit(EditError::EmptyName)));
    }

    #[test]
    fn test_reset() {
        let mut state = AppState::new();
        state.begin_generation().unwrap();
        state.finish_generation(Ok(plan("p")));
        state.open_lookup("hat");

        state.reset();
        assert!(state.plan().is_none());
        assert!(state.lookup().is_none());
    }

    #[test]
    fn test_lookup_completes() {
        let mut state = AppState::new();
        let ticket = state.open_lookup("Wool Scarf fashion");
        assert_eq!(state.lookup().unwrap().status, LookupStatus::Loading);

        assert!(state.complete_lookup(ticket, Ok(vec![suggestion("https://a.test")])));
        assert_eq!(
            state.lookup().unwrap().status,
            LookupStatus::Ready(vec![suggestion("https://a.test")])
        );
    }

    #[test]
    fn test_lookup_failure_is_scoped_to_surface() {
        let mut state = AppState::new();
        state.begin_generation().unwrap();
        state.finish_generation(Ok(plan("p")));

        let ticket = state.open_lookup("hat");
        let err = ShoppingError::Remote(LlmError::InvalidResponse("down".to_string()));
        assert!(state.complete_lookup(ticket, Err(err)));

        assert_eq!(
            state.lookup().unwrap().status,
            LookupStatus::Failed(LOOKUP_FAILED_MESSAGE.to_string())
        );
        assert!(state.error().is_none());
        assert!(state.plan().is_some());
    }

    #[test]
    fn test_stale_lookup_is_discarded() {
        let mut state = AppState::new();
        let first = state.open_lookup("hat");
        let second = state.open_lookup("scarf");

        assert!(!state.complete_lookup(first, Ok(vec![suggestion("https://hat.test")])));
        assert_eq!(state.lookup().unwrap().query, "scarf");
        assert_eq!(state.lookup().unwrap().status, LookupStatus::Loading);

        state.close_lookup();
        assert!(!state.complete_lookup(second, Ok(vec![])));
        assert!(state.lookup().is_none());
    }
}
