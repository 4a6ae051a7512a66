//! Structured logging for workflow runs: start, routing, node execution, snapshots.

use crate::error::AgentError;
use crate::memory::StoreError;

use super::classifier::{Route, Scores};
use super::state::AgentKind;

pub fn log_workflow_start(state_id: &str, query: &str) {
    tracing::info!(state_id, query, "Starting workflow");
}

pub fn log_route(state_id: &str, route: Route, scores: Scores) {
    tracing::info!(
        state_id,
        node_id = route.node_id(),
        sql_score = scores.sql,
        data_score = scores.data,
        "Query classified"
    );
}

pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id, "Starting node execution");
}

pub fn log_node_complete(node_id: &str) {
    tracing::debug!(node_id, "Node execution complete");
}

/// Snapshot failures never fail the query; they are only reported here.
pub fn log_snapshot_failed(state_id: &str, node_id: &str, error: &StoreError) {
    tracing::warn!(state_id, node_id, %error, "Failed to save state snapshot");
}

pub fn log_workflow_complete(state_id: &str, agent_used: AgentKind, is_error: bool) {
    tracing::info!(state_id, %agent_used, is_error, "Workflow complete");
}

pub fn log_workflow_error(state_id: &str, error: &AgentError) {
    tracing::error!(state_id, %error, "Workflow execution error");
}
