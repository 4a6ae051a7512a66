//! LLM-backed SQL agent: question → one SQLite statement → result set.

use std::sync::Arc;

use async_trait::async_trait;

use super::prompt::{describe_frame, extract_sql};
use super::{SqlAgent, SqlAgentOutput};
use crate::dataset::{sqlite, DataFrame};
use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;

const SQL_SYSTEM_PROMPT: &str = "You are a SQLite expert. Write exactly one SQLite query that answers \
the user's question using only the table described below. Reply with the SQL only, no explanation.";

/// Generates SQL with an LLM and runs it against a fresh in-memory copy of the dataset.
///
/// No execution-safety policy is applied beyond capturing errors; every statement runs
/// on its own copy, so nothing it does outlives the call.
pub struct LlmSqlAgent {
    llm: Arc<dyn LlmClient>,
    data: Arc<DataFrame>,
    n_samples: usize,
}

impl LlmSqlAgent {
    pub fn new(llm: Arc<dyn LlmClient>, data: Arc<DataFrame>) -> Self {
        Self {
            llm,
            data,
            n_samples: 1,
        }
    }

    /// Number of example rows included in the prompt (default 1).
    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    fn messages(&self, instructions: &str) -> Vec<Message> {
        vec![
            Message::system(format!(
                "{}\n\n{}",
                SQL_SYSTEM_PROMPT,
                describe_frame(&self.data, self.n_samples)
            )),
            Message::user(instructions),
        ]
    }
}

#[async_trait]
impl SqlAgent for LlmSqlAgent {
    async fn invoke(&self, instructions: &str) -> Result<SqlAgentOutput, AgentError> {
        let reply = self.llm.invoke(&self.messages(instructions)).await?;
        let sql_query = extract_sql(&reply.content)?;
        tracing::debug!(sql = %sql_query, "executing generated sql");
        let data = sqlite::query_frame(Arc::clone(&self.data), sql_query.clone()).await?;
        Ok(SqlAgentOutput {
            sql_query,
            data: Some(data),
        })
    }
}
