//! Google Gemini API client implementation
//!
//! Implements the GenAiClient trait for the `generateContent` REST endpoint,
//! covering structured JSON output, inline image parts and search grounding.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::{GenAiClient, GenerateRequest, GenerateResponse, GroundingCitation, LlmError, Part, Tool};
use crate::config::LlmConfig;

/// Gemini REST client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Resolves the API key from the configured environment variable and
    /// fails fast when it is missing.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config.get_api_key()?;

        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            debug!(%timeout_ms, "from_config: request timeout set");
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(LlmError::Network)?;

        Ok(Self::with_http(http, &config.model, api_key, &config.base_url))
    }

    /// Create a client with an explicit key and a default HTTP client
    pub fn new(model: impl Into<String>, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_http(Client::new(), model, api_key, base_url)
    }

    fn with_http(
        http: Client,
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the generateContent API
    fn build_request_body(&self, request: &GenerateRequest) -> Value {
        debug!(part_count = request.parts.len(), "build_request_body: called");
        let parts: Vec<Value> = request.parts.iter().map(convert_part).collect();

        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": parts,
            }],
        });

        if let Some(schema) = &request.response_schema {
            debug!("build_request_body: structured output requested");
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        if !request.tools.is_empty() {
            debug!(tool_count = request.tools.len(), "build_request_body: adding tools");
            body["tools"] = json!(request.tools.iter().map(convert_tool).collect::<Vec<_>>());
        }

        body
    }

    /// Parse the generateContent response
    ///
    /// Only the first candidate is used: its text parts are concatenated and
    /// its web grounding chunks become citations.
    fn parse_response(&self, api_response: GeminiResponse) -> GenerateResponse {
        debug!(candidates = api_response.candidates.len(), "parse_response: called");
        let Some(candidate) = api_response.candidates.into_iter().next() else {
            debug!("parse_response: no candidates");
            return GenerateResponse::default();
        };

        if let Some(reason) = &candidate.finish_reason {
            debug!(%reason, "parse_response: finish reason");
        }

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text)
            .collect();

        let citations = candidate
            .grounding_metadata
            .map(|m| m.grounding_chunks)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|chunk| chunk.web)
            .map(|web| GroundingCitation {
                title: web.title,
                uri: web.uri,
            })
            .collect::<Vec<_>>();
        debug!(text_len = text.len(), citations = citations.len(), "parse_response: parsed");

        GenerateResponse {
            text: if text.is_empty() { None } else { Some(text) },
            citations,
        }
    }
}

fn convert_part(part: &Part) -> Value {
    match part {
        Part::Text(text) => json!({ "text": text }),
        Part::InlineData { mime_type, data } => json!({
            "inlineData": {
                "mimeType": mime_type,
                "data": data,
            }
        }),
    }
}

fn convert_tool(tool: &Tool) -> Value {
    match tool {
        Tool::GoogleSearch => json!({ "googleSearch": {} }),
    }
}

/// Pull the human readable message out of a Gemini error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<GeminiErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl GenAiClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        debug!(%self.model, "generate: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "generate: API error");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        debug!("generate: success");
        let api_response: GeminiResponse = response.json().await?;
        Ok(self.parse_response(api_response))
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    grounding_metadata: Option<GeminiGroundingMetadata>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingChunk {
    web: Option<GeminiWebChunk>,
}

#[derive(Debug, Deserialize)]
struct GeminiWebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}
