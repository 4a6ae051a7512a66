//! LLM-backed wrangling + visualization pair.
//!
//! Three steps per question:
//! 1. routing preprocessor: split the question into wrangling / visualization
//!    instructions and decide `chart` or `table`;
//! 2. wrangling: one SQLite SELECT over the dataset copy;
//! 3. visualization (only for `chart`): a Plotly figure JSON built from the wrangled rows.
//!
//! A visualization failure sets `plotly_error` instead of failing the call so the
//! caller can fall back to the table.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::prompt::{describe_frame, extract_json, extract_sql};
use super::{AnalystResponse, DataAnalyst, WrangledData};
use crate::dataset::{sqlite, DataFrame};
use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;

const ROUTING_PROMPT: &str = r#"You route data-analysis requests. Decide whether the user wants a chart or a table,
and split the request into instructions for a data wrangling step and a data visualization step.
Reply with JSON only:
{"user_instructions_data_wrangling": "...", "user_instructions_data_visualization": "...", "routing_preprocessor_decision": "chart" | "table"}"#;

const WRANGLING_PROMPT: &str = "You are a data wrangling expert. Write exactly one SQLite SELECT statement over the \
table described below that prepares the data for the instructions. Reply with the SQL only.";

const VISUALIZATION_PROMPT: &str = "You are a data visualization expert. Build a Plotly figure for the instructions \
from the rows below. Reply with the figure JSON only, an object with `data` and `layout` keys.";

#[derive(Debug, Deserialize)]
struct RoutingPlan {
    #[serde(default)]
    user_instructions_data_wrangling: Option<String>,
    #[serde(default)]
    user_instructions_data_visualization: Option<String>,
    routing_preprocessor_decision: String,
}

/// Wrangling + visualization agents driven by one LLM client.
pub struct LlmDataAnalyst {
    llm: Arc<dyn LlmClient>,
    n_samples: usize,
}

impl LlmDataAnalyst {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            n_samples: 100,
        }
    }

    /// Number of rows shown to the model in prompts (default 100).
    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    async fn route(&self, instructions: &str, data: &DataFrame) -> Result<RoutingPlan, AgentError> {
        let messages = vec![
            Message::system(format!("{}\n\n{}", ROUTING_PROMPT, describe_frame(data, 0))),
            Message::user(instructions),
        ];
        let reply = self.llm.invoke(&messages).await?;
        let plan: RoutingPlan = serde_json::from_value(extract_json(&reply.content)?).map_err(|e| {
            AgentError::ExecutionFailed(format!("routing preprocessor returned invalid plan: {}", e))
        })?;
        Ok(plan)
    }

    async fn wrangle(&self, instructions: &str, data: &DataFrame) -> Result<DataFrame, AgentError> {
        let messages = vec![
            Message::system(format!(
                "{}\n\n{}",
                WRANGLING_PROMPT,
                describe_frame(data, self.n_samples)
            )),
            Message::user(instructions),
        ];
        let reply = self.llm.invoke(&messages).await?;
        let sql = extract_sql(&reply.content)?;
        tracing::debug!(sql = %sql, "wrangling");
        sqlite::query_frame(Arc::new(data.clone()), sql).await
    }

    /// Returns the figure, or `None` when the model failed or replied with something
    /// that is not a figure.
    async fn visualize(&self, instructions: &str, wrangled: &DataFrame) -> Option<Value> {
        let rows = serde_json::to_string(&wrangled.head(self.n_samples).to_records()).ok()?;
        let messages = vec![
            Message::system(format!("{}\n\nRows: {}", VISUALIZATION_PROMPT, rows)),
            Message::user(instructions),
        ];
        let reply = match self.llm.invoke(&messages).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "visualization step failed");
                return None;
            }
        };
        match extract_json(&reply.content) {
            Ok(figure) if figure.get("data").is_some() => Some(figure),
            Ok(_) => {
                tracing::warn!("visualization step returned JSON without `data`");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "visualization step returned invalid figure");
                None
            }
        }
    }
}

#[async_trait]
impl DataAnalyst for LlmDataAnalyst {
    async fn invoke(
        &self,
        instructions: &str,
        data: &DataFrame,
    ) -> Result<Option<AnalystResponse>, AgentError> {
        let plan = self.route(instructions, data).await?;
        let decision = plan.routing_preprocessor_decision.trim().to_lowercase();
        tracing::debug!(decision = %decision, "routing preprocessor");

        let wrangling = plan
            .user_instructions_data_wrangling
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| instructions.to_string());
        let wrangled = self.wrangle(&wrangling, data).await?;

        let mut response = AnalystResponse {
            routing_preprocessor_decision: Some(decision.clone()),
            ..Default::default()
        };
        if decision == "chart" {
            let viz = plan
                .user_instructions_data_visualization
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| instructions.to_string());
            match self.visualize(&viz, &wrangled).await {
                Some(figure) => response.plotly_graph = Some(figure),
                None => response.plotly_error = true,
            }
        }
        response.data_wrangled = Some(WrangledData::Frame(wrangled));
        Ok(Some(response))
    }
}
