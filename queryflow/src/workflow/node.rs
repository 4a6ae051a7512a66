//! Branch nodes: each runs one tool and records its result on the state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::tools::{DataAnalystAgent, SqlDataAnalystAgent};

use super::state::{AgentKind, AgentState};

/// One step of the workflow: receive state, return updated state.
///
/// **Interaction**: [`AgentWorkflow`](super::AgentWorkflow) dispatches to exactly one
/// node per query, chosen by [`Route`](super::Route).
#[async_trait]
pub trait Node: Send + Sync {
    /// Node id (e.g. `"use_sql_agent"`), also written into snapshot metadata.
    fn id(&self) -> &str;

    async fn run(&self, state: AgentState) -> Result<AgentState, AgentError>;
}

/// Runs the query through the SQL branch.
pub struct UseSqlAgent {
    tool: Arc<SqlDataAnalystAgent>,
}

impl UseSqlAgent {
    pub fn new(tool: Arc<SqlDataAnalystAgent>) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl Node for UseSqlAgent {
    fn id(&self) -> &str {
        "use_sql_agent"
    }

    async fn run(&self, mut state: AgentState) -> Result<AgentState, AgentError> {
        let result = self.tool.process_query(&state.query).await;
        state.result = Some(result.into());
        state.agent_used = Some(AgentKind::SqlDataAnalyst);
        Ok(state)
    }
}

/// Runs the query through the data-analysis branch.
pub struct UseDataAgent {
    tool: Arc<DataAnalystAgent>,
}

impl UseDataAgent {
    pub fn new(tool: Arc<DataAnalystAgent>) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl Node for UseDataAgent {
    fn id(&self) -> &str {
        "use_data_agent"
    }

    async fn run(&self, mut state: AgentState) -> Result<AgentState, AgentError> {
        let result = self.tool.process_query(&state.query).await;
        state.result = Some(result.into());
        state.agent_used = Some(AgentKind::DataAnalyst);
        Ok(state)
    }
}
