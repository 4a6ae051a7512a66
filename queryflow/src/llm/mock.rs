//! Mock LLM for tests: scripted replies, recorded prompts.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmClient, LlmResponse};
use crate::error::AgentError;
use crate::message::Message;

/// Mock LLM: returns scripted replies in order; the last reply repeats once the
/// script is exhausted. Every call's messages are recorded for assertions.
pub struct MockLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<Result<String, String>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Replies with each string in turn.
    pub fn new<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::from_script(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Always replies with `content`.
    pub fn with_reply(content: impl Into<String>) -> Self {
        Self::new([content.into()])
    }

    /// Every call fails with `AgentError::ExecutionFailed(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_script(VecDeque::from([Err(message.into())]))
    }

    fn from_script(script: VecDeque<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(script),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Messages received by each call so far.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        let next = {
            let mut replies = self
                .replies
                .lock()
                .map_err(|e| AgentError::ExecutionFailed(e.to_string()))?;
            let mut last = self
                .last
                .lock()
                .map_err(|e| AgentError::ExecutionFailed(e.to_string()))?;
            match replies.pop_front() {
                Some(r) => {
                    *last = Some(r.clone());
                    Some(r)
                }
                None => last.clone(),
            }
        };
        match next {
            Some(Ok(content)) => Ok(LlmResponse { content }),
            Some(Err(message)) => Err(AgentError::ExecutionFailed(message)),
            None => Err(AgentError::ExecutionFailed("MockLlm has no replies".into())),
        }
    }
}
