//! GenAiClient trait definition

use async_trait::async_trait;

use super::{GenerateRequest, GenerateResponse, LlmError};

/// Stateless generative model client - each call is independent
///
/// Both the plan generator and the shopping lookup go through this trait,
/// so tests can swap in a scripted client.
#[async_trait]
pub trait GenAiClient: Send + Sync {
    /// Send a single generation request and wait for the full reply
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock client for unit tests
    ///
    /// Replays the scripted responses in order and records every request.
    pub struct MockGenAiClient {
        responses: Vec<Result<GenerateResponse, String>>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl MockGenAiClient {
        pub fn new(responses: Vec<GenerateResponse>) -> Self {
            debug!(response_count = %responses.len(), "MockGenAiClient::new: called");
            Self::scripted(responses.into_iter().map(Ok).collect())
        }

        /// Script successes and failures; `Err` entries become API errors
        pub fn scripted(responses: Vec<Result<GenerateResponse, String>>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl GenAiClient for MockGenAiClient {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
            debug!("MockGenAiClient::generate: called");
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx) {
                Some(Ok(response)) => Ok(response.clone()),
                Some(Err(message)) => Err(LlmError::ApiError {
                    status: 500,
                    message: message.clone(),
                }),
                None => Err(LlmError::InvalidResponse("No more mock responses".to_string())),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockGenAiClient::new(vec![GenerateResponse::text("one"), GenerateResponse::text("two")]);

            let resp1 = client.generate(GenerateRequest::default()).await.unwrap();
            assert_eq!(resp1.text.as_deref(), Some("one"));

            let resp2 = client.generate(GenerateRequest::default()).await.unwrap();
            assert_eq!(resp2.text.as_deref(), Some("two"));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_scripted_error() {
            let client = MockGenAiClient::scripted(vec![Err("boom".to_string())]);
            let result = client.generate(GenerateRequest::default()).await;
            assert!(matches!(result, Err(LlmError::ApiError { status: 500, .. })));
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockGenAiClient::new(vec![]);
            assert!(client.generate(GenerateRequest::default()).await.is_err());
        }
    }
}
