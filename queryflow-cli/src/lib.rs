//! queryflow-cli library: one-shot query runs for the `queryflow` binary and other crates.
//!
//! Reads config from env / .env, builds the workflow, routes one query, returns the response.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), queryflow_cli::Error> {
//! let response = queryflow_cli::run("count rows in the table").await?;
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! # Ok(())
//! # }
//! ```

mod options;
mod run;

pub use options::RunOptions;
pub use queryflow::QueryResponse;
pub use run::{run, run_with_options, run_with_workflow, Error};
