//! Per-request workflow state and the branch labels it records.

use serde::{Deserialize, Serialize};

use crate::result::QueryResult;

/// Which branch handled the query. Serialized as `sql_data_analyst` / `data_analyst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    SqlDataAnalyst,
    DataAnalyst,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::SqlDataAnalyst => "sql_data_analyst",
            AgentKind::DataAnalyst => "data_analyst",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State flowing through one workflow run.
///
/// Created from the query, updated once by the branch node that runs, and snapshotted
/// as JSON before and after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub query: String,
    #[serde(default)]
    pub result: Option<QueryResult>,
    #[serde(default)]
    pub agent_used: Option<AgentKind>,
}

impl AgentState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            result: None,
            agent_used: None,
        }
    }
}
