//! Branch tools: one per workflow branch.
//!
//! Each tool loads the dataset at construction (exactly one CSV, else
//! [`ConfigError`](crate::error::ConfigError)), wraps an agent, and turns whatever the
//! agent does into a normalized result record. Agent failures never escape `process_query`.

mod data_analyst;
mod sql_data_analyst;

pub use data_analyst::DataAnalystAgent;
pub use sql_data_analyst::SqlDataAnalystAgent;
