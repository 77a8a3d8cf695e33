//! Shopping suggestion type

use serde::{Deserialize, Serialize};

/// One candidate purchase link for an outfit item
///
/// Only lives for as long as the lookup surface showing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingSuggestion {
    pub title: String,
    pub link: String,
    /// Merchant or provider label
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}
