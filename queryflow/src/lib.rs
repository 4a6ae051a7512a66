//! # queryflow
//!
//! Routes a natural-language analytics question to one of two agent branches and
//! returns a structured result: a chart, a table, an SQL result, or an error record.
//!
//! ## Flow
//!
//! ```text
//! query ─► QueryClassifier ─┬─► UseSqlAgent  ─► SqlDataAnalystAgent ─► SqlResult
//!                           └─► UseDataAgent ─► DataAnalystAgent    ─► AnalysisResult
//! ```
//!
//! The classifier scores the query against two keyword lists; SQL wins only on a strictly
//! higher score. Exactly one branch runs per query. [`AgentWorkflow`] snapshots the state
//! before and after through [`StatePersistence`](memory::StatePersistence).
//!
//! ## Main Modules
//!
//! - [`workflow`]: `AgentWorkflow`, `QueryClassifier`, branch nodes, `AgentState`.
//! - [`tools`]: branch tools that normalize agent output into result records.
//! - [`agents`]: `SqlAgent` / `DataAnalyst` traits and their LLM-backed defaults.
//! - [`dataset`]: CSV discovery and loading, `DataFrame`, in-memory SQLite copies.
//! - [`llm`]: `LlmClient` trait, `MockLlm`, and `ChatOpenAI` (feature `openai`).
//! - [`memory`]: document stores and state persistence.
//!
//! ## Features
//!
//! - `openai` (default): `ChatOpenAI` via `async-openai`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use queryflow::{AgentWorkflow, MockLlm, WorkflowConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WorkflowConfig::new("sk-test").with_data_dir("./data");
//! let llm = Arc::new(MockLlm::with_reply("SELECT COUNT(*) AS n FROM data"));
//! let workflow = AgentWorkflow::from_config(&config, llm)?;
//! let response = workflow.process_query("count the rows in the table").await?;
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod config;
pub mod dataset;
pub mod error;
pub mod llm;
pub mod memory;
pub mod message;
pub mod result;
pub mod tools;
pub mod workflow;

pub use config::WorkflowConfig;
pub use dataset::DataFrame;
pub use error::{AgentError, ConfigError};
pub use llm::{LlmClient, LlmResponse, MockLlm};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use memory::{
    DocumentStatePersistence, DocumentStore, InMemoryDocumentStore, PersistenceConfig,
    SqliteDocumentStore, StatePersistence, StoreError,
};
pub use message::Message;
pub use result::{AnalysisResult, QueryResult, SqlResult, ERROR_PREFIX};
pub use tools::{DataAnalystAgent, SqlDataAnalystAgent};
pub use workflow::{AgentKind, AgentState, AgentWorkflow, QueryClassifier, QueryResponse, Route};
