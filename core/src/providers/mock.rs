use crate::traits::{ChatRequest, ChatResponse, Provider};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// A provider that replays scripted responses and records every request it
/// receives, serialized to JSON, for inspection in tests.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ChatResponse>>>,
    repeat: Option<ChatResponse>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with the same response.
    pub fn repeating(response: ChatResponse) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            repeat: Some(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(anyhow::anyhow!(message.into())));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        let serialized = serde_json::to_string(&request)?;
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(serialized);

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match (next, &self.repeat) {
            (Some(response), _) => response,
            (None, Some(response)) => Ok(response.clone()),
            (None, None) => Err(anyhow::anyhow!("No scripted response left")),
        }
    }
}
