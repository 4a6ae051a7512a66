//! SQL branch tool: question → generated SQL + rows, as a [`SqlResult`].

use std::path::Path;
use std::sync::Arc;

use crate::agents::{LlmSqlAgent, SqlAgent};
use crate::dataset::{load_dataset, DataFrame};
use crate::error::ConfigError;
use crate::llm::LlmClient;
use crate::result::{SqlResult, ERROR_PREFIX};

/// Loads the dataset into an in-memory SQL table and answers questions through an [`SqlAgent`].
pub struct SqlDataAnalystAgent {
    data: Arc<DataFrame>,
    agent: Arc<dyn SqlAgent>,
}

impl SqlDataAnalystAgent {
    /// Loads the single CSV in `data_dir` and wires an [`LlmSqlAgent`] over it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::CsvFileCount`] when `data_dir` does not hold exactly one CSV file.
    pub fn new(data_dir: &Path, llm: Arc<dyn LlmClient>) -> Result<Self, ConfigError> {
        let data = Arc::new(load_dataset(data_dir)?);
        let agent = Arc::new(LlmSqlAgent::new(llm, Arc::clone(&data)));
        Ok(Self { data, agent })
    }

    /// Uses an already loaded dataset and a custom agent.
    pub fn with_agent(data: Arc<DataFrame>, agent: Arc<dyn SqlAgent>) -> Self {
        Self { data, agent }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Shared handle to the loaded dataset, for wiring other tools without reloading.
    pub fn shared_data(&self) -> Arc<DataFrame> {
        Arc::clone(&self.data)
    }

    /// Runs the question through the agent.
    ///
    /// - rows returned → `Success { sql_query, data }`
    /// - no table or zero rows → `Error { "No data returned from the query" }`
    /// - agent failure → `Error { "Error processing query: {message}" }`
    pub async fn process_query(&self, user_question: &str) -> SqlResult {
        match self.agent.invoke(user_question).await {
            Ok(output) => match output.data {
                Some(frame) if !frame.is_empty() => SqlResult::Success {
                    sql_query: output.sql_query,
                    data: frame.to_records(),
                },
                _ => SqlResult::error("No data returned from the query"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "sql agent failed");
                SqlResult::error(format!("{}{}", ERROR_PREFIX, e))
            }
        }
    }
}
