//! Dataset: the single CSV the agents work on.
//!
//! [`load_dataset`] enforces the one-file rule and infers column types;
//! [`sqlite`] copies a [`DataFrame`] into an in-memory database for SQL execution.

mod frame;
mod loader;
pub mod sqlite;

pub use frame::{ColumnKind, DataFrame, Row};
pub use loader::{discover_csv, load_csv, load_dataset};
