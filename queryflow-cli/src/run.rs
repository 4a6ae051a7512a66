//! Run entry points: run with env config, or with overrides.

use std::sync::Arc;

use queryflow::{AgentWorkflow, LlmClient, QueryResponse, WorkflowConfig};

use crate::options::RunOptions;

/// Error type used by the CLI entry points.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Routes one query with config from env (and .env).
pub async fn run(query: &str) -> Result<QueryResponse, Error> {
    run_with_options(query, &RunOptions::default()).await
}

/// Routes one query with config from env plus `options`.
pub async fn run_with_options(query: &str, options: &RunOptions) -> Result<QueryResponse, Error> {
    dotenv::dotenv().ok();
    let mut config = WorkflowConfig::from_env()?;
    options.apply(&mut config);
    let llm: Arc<dyn LlmClient> = Arc::new(config.chat_model());
    let workflow = AgentWorkflow::from_config(&config, llm)?;
    run_with_workflow(&workflow, query, options.state_id.as_deref()).await
}

/// Routes one query through an already built workflow.
pub async fn run_with_workflow(
    workflow: &AgentWorkflow,
    query: &str,
    state_id: Option<&str>,
) -> Result<QueryResponse, Error> {
    let response = match state_id {
        Some(id) => workflow.process_query_with_id(query, id).await?,
        None => workflow.process_query(query).await?,
    };
    Ok(response)
}
