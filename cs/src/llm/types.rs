//! Request/response types for content generation
//!
//! These model the Gemini `generateContent` call but stay small enough that
//! another provider could be slotted in behind `GenAiClient`.

use serde_json::Value;
use tracing::debug;

/// One piece of the user turn
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Plain instruction text
    Text(String),

    /// Inline binary data, already base64 encoded
    InlineData { mime_type: String, data: String },
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }

    /// Create an inline image part from base64 data
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        debug!(%mime_type, "Part::inline_data: called");
        Part::InlineData {
            mime_type,
            data: data.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::InlineData { .. } => None,
        }
    }
}

/// Server-side tools the model may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Web search grounding
    GoogleSearch,
}

/// Everything needed for one generation call
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Parts of the single user turn, in order
    pub parts: Vec<Part>,

    /// When set, the reply must be JSON matching this schema
    pub response_schema: Option<Value>,

    /// Tools enabled for this call
    pub tools: Vec<Tool>,
}

impl GenerateRequest {
    pub fn new(parts: Vec<Part>) -> Self {
        debug!(part_count = parts.len(), "GenerateRequest::new: called");
        Self {
            parts,
            ..Default::default()
        }
    }

    /// Require a JSON reply matching `schema`
    pub fn with_json_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// All text parts joined with newlines
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect::<Vec<_>>().join("\n")
    }

    pub fn has_inline_data(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, Part::InlineData { .. }))
    }
}

/// An attributed web source backing a grounded reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingCitation {
    pub title: Option<String>,
    pub uri: Option<String>,
}

impl GroundingCitation {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            uri: Some(uri.into()),
        }
    }
}

/// Result of a generation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    /// Reply text, `None` when the model produced none
    pub text: Option<String>,

    /// Web citations, only present on search-grounded calls
    pub citations: Vec<GroundingCitation>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            citations: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = GenerateRequest::new(vec![Part::text("hello"), Part::inline_data("image/png", "AAAA")])
            .with_json_schema(serde_json::json!({"type": "ARRAY"}))
            .with_tool(Tool::GoogleSearch);

        assert_eq!(request.parts.len(), 2);
        assert!(request.response_schema.is_some());
        assert_eq!(request.tools, vec![Tool::GoogleSearch]);
        assert!(request.has_inline_data());
    }

    #[test]
    fn test_request_text_skips_inline_data() {
        let request = GenerateRequest::new(vec![
            Part::text("first"),
            Part::inline_data("image/jpeg", "AAAA"),
            Part::text("second"),
        ]);
        assert_eq!(request.text(), "first\nsecond");
    }

    #[test]
    fn test_response_text() {
        let response = GenerateResponse::text("[]");
        assert_eq!(response.text.as_deref(), Some("[]"));
        assert!(response.citations.is_empty());
    }
}
