//! Shopping lookup
//!
//! Turns an outfit item description into at most four purchase links using a
//! search-grounded model call, with a deterministic search-page fallback.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{OutfitItem, ShoppingSuggestion};
use crate::llm::{GenAiClient, GenerateRequest, GroundingCitation, LlmError, Part, Tool};
use crate::prompts::{PROMPT_TEMPLATE_MESSAGE, PromptError, PromptLoader};

/// Most suggestions shown for one lookup
pub const MAX_SUGGESTIONS: usize = 4;

/// The one message users see for any lookup failure
pub const LOOKUP_FAILED_MESSAGE: &str = "Could not fetch shopping suggestions.";

/// Source label for grounded results
const SEARCH_SOURCE: &str = "Google Search";
/// Source label for the fallback link
const SHOPPING_SOURCE: &str = "Google Shopping";
const CITATION_PRICE: &str = "Check Link";
const FALLBACK_PRICE: &str = "View Prices";
const UNTITLED_RESULT: &str = "Product Result";

/// Why a lookup failed
#[derive(Debug, Error)]
pub enum ShoppingError {
    #[error("Failed to build shopping request: {0}")]
    Prompt(#[from] PromptError),

    #[error("Shopping search failed: {0}")]
    Remote(#[from] LlmError),
}

impl ShoppingError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Prompt(_) => PROMPT_TEMPLATE_MESSAGE,
            Self::Remote(_) => LOOKUP_FAILED_MESSAGE,
        }
    }
}

/// Shopping search URL for a query, e.g. `https://www.google.com/search?tbm=shop&q=red%20scarf`
pub fn search_url(search_base: &str, query: &str) -> String {
    format!("{}?tbm=shop&q={}", search_base, urlencoding::encode(query))
}

/// Query for one outfit item: name, color if any, and a fashion hint
pub fn query_for_item(item: &OutfitItem) -> String {
    [Some(item.name.trim()), item.color.as_deref().map(str::trim), Some("fashion")]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map grounding citations to suggestions
///
/// Citations without a URI are dropped. With nothing usable left, a single
/// fallback pointing at the search page is returned. Links are deduplicated
/// (first wins) and the list is capped at `MAX_SUGGESTIONS`.
pub fn suggestions_from_citations(
    citations: &[GroundingCitation],
    query: &str,
    search_base: &str,
) -> Vec<ShoppingSuggestion> {
    debug!(citations = citations.len(), %query, "suggestions_from_citations: called");
    let mut suggestions: Vec<ShoppingSuggestion> = citations
        .iter()
        .filter_map(|citation| {
            let link = citation.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
            let title = citation
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED_RESULT);
            Some(ShoppingSuggestion {
                title: title.to_string(),
                link: link.to_string(),
                source: SEARCH_SOURCE.to_string(),
                price: Some(CITATION_PRICE.to_string()),
                thumbnail: None,
            })
        })
        .collect();

    if suggestions.is_empty() {
        debug!("suggestions_from_citations: no usable citations, using fallback");
        suggestions.push(ShoppingSuggestion {
            title: format!("Search for \"{}\"", query),
            link: search_url(search_base, query),
            source: SHOPPING_SOURCE.to_string(),
            price: Some(FALLBACK_PRICE.to_string()),
            thumbnail: None,
        });
    }

    let mut seen = HashSet::new();
    suggestions.retain(|s| seen.insert(s.link.clone()));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Looks up purchase links through a search-grounded model call
pub struct ShoppingLookup {
    client: Arc<dyn GenAiClient>,
    prompts: Arc<PromptLoader>,
    search_base: String,
}

impl ShoppingLookup {
    pub fn new(client: Arc<dyn GenAiClient>, prompts: Arc<PromptLoader>, search_base: impl Into<String>) -> Self {
        Self {
            client,
            prompts,
            search_base: search_base.into(),
        }
    }

    /// The always-present "view more" link for a query
    pub fn view_more_url(&self, query: &str) -> String {
        search_url(&self.search_base, query)
    }

    /// Find up to `MAX_SUGGESTIONS` links for a query
    ///
    /// One remote call, no retries. Always returns at least one link on success.
    pub async fn lookup(&self, query: &str) -> Result<Vec<ShoppingSuggestion>, ShoppingError> {
        info!(%query, "Looking up shopping suggestions");
        let request = GenerateRequest::new(vec![Part::text(self.prompts.shopping(query)?)]).with_tool(Tool::GoogleSearch);

        let response = self.client.generate(request).await.map_err(|e| {
            warn!(error = %e, "lookup: remote call failed");
            ShoppingError::Remote(e)
        })?;

        let suggestions = suggestions_from_citations(&response.citations, query, &self.search_base);
        debug!(count = suggestions.len(), "lookup: done");
        Ok(suggestions)
    }
}
