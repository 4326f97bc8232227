use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tryon_relay::{
    Error, Result,
    gradio::{RemoteResult, TryOnClient, TryOnRequest},
};

/// Mock remote client for testing
#[derive(Debug, Clone)]
pub struct MockTryOnClient {
    pub responses: Arc<Mutex<Vec<RemoteResult>>>,
    pub requests: Arc<Mutex<Vec<TryOnRequest>>>,
    /// Contents of the staged files as seen during each call.
    pub staged_contents: Arc<Mutex<Vec<(Vec<u8>, Vec<u8>)>>>,
    pub error: Option<String>,
}

impl MockTryOnClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            staged_contents: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_responses(self, responses: Vec<RemoteResult>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_requests(&self) -> Vec<TryOnRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn get_staged_contents(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.staged_contents.lock().unwrap().clone()
    }
}

#[async_trait]
impl TryOnClient for MockTryOnClient {
    async fn try_on(&self, request: TryOnRequest) -> Result<RemoteResult> {
        let human = tokio::fs::read(&request.person.background).await?;
        let garment = tokio::fs::read(&request.garment).await?;
        self.staged_contents.lock().unwrap().push((human, garment));
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::remote(error.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::remote("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for MockTryOnClient {
    fn default() -> Self {
        Self::new()
    }
}
