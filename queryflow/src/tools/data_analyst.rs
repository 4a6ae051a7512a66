//! Data-analysis branch tool: question → chart or table, as an [`AnalysisResult`].

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::agents::{DataAnalyst, LlmDataAnalyst};
use crate::dataset::{load_dataset, DataFrame};
use crate::error::{AgentError, ConfigError};
use crate::llm::LlmClient;
use crate::result::{AnalysisResult, ERROR_PREFIX};

/// Runs the wrangling + visualization pair on the dataset and picks chart or table.
pub struct DataAnalystAgent {
    data: Arc<DataFrame>,
    analyst: Arc<dyn DataAnalyst>,
}

/// Python-style truthiness: null, false, 0, and empty strings/arrays/objects are empty.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl DataAnalystAgent {
    /// Loads the single CSV in `data_dir` and wires an [`LlmDataAnalyst`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::CsvFileCount`] when `data_dir` does not hold exactly one CSV file.
    pub fn new(data_dir: &Path, llm: Arc<dyn LlmClient>) -> Result<Self, ConfigError> {
        let data = Arc::new(load_dataset(data_dir)?);
        Ok(Self::with_default_agent(data, llm))
    }

    /// Uses an already loaded dataset with an [`LlmDataAnalyst`].
    pub fn with_default_agent(data: Arc<DataFrame>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            data,
            analyst: Arc::new(LlmDataAnalyst::new(llm)),
        }
    }

    /// Uses an already loaded dataset and a custom analyst.
    pub fn with_agent(data: Arc<DataFrame>, analyst: Arc<dyn DataAnalyst>) -> Self {
        Self { data, analyst }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Runs the question and normalizes the analyst's response.
    ///
    /// Chart wins when the routing decision is `chart`, rendering did not fail and the
    /// plot payload is non-empty; otherwise the wrangled table is returned; otherwise an
    /// error record. Any failure becomes `Error { "Error processing query: {message}" }`.
    pub async fn process_query(&self, user_question: &str) -> AnalysisResult {
        match self.run(user_question).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "data analyst failed");
                AnalysisResult::error(format!("{}{}", ERROR_PREFIX, e))
            }
        }
    }

    async fn run(&self, user_question: &str) -> Result<AnalysisResult, AgentError> {
        let Some(response) = self.analyst.invoke(user_question, &self.data).await? else {
            return Ok(AnalysisResult::error("No response from the agent"));
        };
        if response.is_empty() {
            return Ok(AnalysisResult::error("No result from the agent"));
        }

        let wants_chart = response.routing_preprocessor_decision.as_deref() == Some("chart");
        if wants_chart && !response.plotly_error {
            return Ok(match response.plotly_graph.filter(is_truthy) {
                Some(data) => AnalysisResult::Chart { data },
                None => AnalysisResult::error("No valid chart data returned"),
            });
        }

        if let Some(wrangled) = response.data_wrangled {
            let frame = wrangled.into_frame()?;
            return Ok(AnalysisResult::Table {
                data: frame.to_records(),
            });
        }

        Ok(AnalysisResult::error("No data returned by the agent"))
    }
}
