//! LLM client abstraction used by the SQL and data-analysis agents.
//!
//! The workflow never calls the model directly: it constructs a client and hands it to
//! the agents. Implementations: [`MockLlm`] (scripted replies) and `ChatOpenAI`
//! (real API, feature `openai`).

mod mock;

#[cfg(feature = "openai")]
mod openai;

pub use mock::MockLlm;

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Response from an LLM completion: assistant message text.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
}

/// LLM client: given messages, returns the assistant reply.
///
/// **Interaction**: Shared as `Arc<dyn LlmClient>` by `LlmSqlAgent` and `LlmDataAnalyst`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}
