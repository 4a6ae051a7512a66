//! Agents wrapped by the branch tools.
//!
//! The branch tools in [`crate::tools`] only depend on the [`SqlAgent`] and
//! [`DataAnalyst`] traits; the LLM-backed implementations here are the defaults the
//! server wires in. Tests substitute their own implementations.

mod pandas_analyst;
mod prompt;
mod sql_database;

pub use pandas_analyst::LlmDataAnalyst;
pub use prompt::{extract_json, extract_sql};
pub use sql_database::LlmSqlAgent;

use async_trait::async_trait;
use serde_json::Value;

use crate::dataset::DataFrame;
use crate::error::AgentError;

/// What the SQL agent produced for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlAgentOutput {
    /// Generated SQL text.
    pub sql_query: String,
    /// Result set; `None` when the agent produced no table.
    pub data: Option<DataFrame>,
}

/// SQL-generation agent bound to one dataset.
#[async_trait]
pub trait SqlAgent: Send + Sync {
    async fn invoke(&self, instructions: &str) -> Result<SqlAgentOutput, AgentError>;
}

/// Wrangled output of the analyst: either already a table or raw JSON that still
/// needs coercing.
#[derive(Debug, Clone, PartialEq)]
pub enum WrangledData {
    Frame(DataFrame),
    Raw(Value),
}

impl WrangledData {
    pub fn into_frame(self) -> Result<DataFrame, AgentError> {
        match self {
            WrangledData::Frame(frame) => Ok(frame),
            WrangledData::Raw(value) => DataFrame::from_json(&value),
        }
    }
}

impl From<DataFrame> for WrangledData {
    fn from(frame: DataFrame) -> Self {
        WrangledData::Frame(frame)
    }
}

/// Response of the wrangling + visualization agent pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalystResponse {
    /// `"chart"` or `"table"` as decided by the routing preprocessor.
    pub routing_preprocessor_decision: Option<String>,
    /// Plot payload (Plotly figure JSON, or its serialized string).
    pub plotly_graph: Option<Value>,
    /// Set when the visualization step failed to render.
    pub plotly_error: bool,
    pub data_wrangled: Option<WrangledData>,
}

impl AnalystResponse {
    /// True when the response carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.routing_preprocessor_decision.is_none()
            && self.plotly_graph.is_none()
            && !self.plotly_error
            && self.data_wrangled.is_none()
    }
}

/// Wrangling + visualization agent pair. `Ok(None)` means the agent produced no response.
#[async_trait]
pub trait DataAnalyst: Send + Sync {
    async fn invoke(
        &self,
        instructions: &str,
        data: &DataFrame,
    ) -> Result<Option<AnalystResponse>, AgentError>;
}
