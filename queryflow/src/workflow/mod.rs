//! Query workflow: classifier → one branch node → response.
//!
//! A fixed two-level decision: [`QueryClassifier`] picks a [`Route`], the matching
//! [`Node`] runs the branch tool, and [`AgentWorkflow`] snapshots state before and after.

mod classifier;
mod driver;
mod logging;
mod node;
mod state;

pub use classifier::{QueryClassifier, Route, Scores, DATA_KEYWORDS, SQL_KEYWORDS};
pub use driver::{AgentWorkflow, QueryResponse, START_NODE};
pub use node::{Node, UseDataAgent, UseSqlAgent};
pub use state::{AgentKind, AgentState};
