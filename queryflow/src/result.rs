//! Normalized result records returned by the two branches.
//!
//! The branches use different shapes on purpose: [`AnalysisResult`] is tagged by
//! `type`, [`SqlResult`] by `status`. [`QueryResult`] holds either without a unifying schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::Row;

/// Prefix of every error record produced from an agent failure.
pub const ERROR_PREFIX: &str = "Error processing query: ";

/// Data-analysis branch result: `{type: chart|table|error, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalysisResult {
    /// Plot payload, returned unchanged.
    Chart { data: Value },
    Table { data: Vec<Row> },
    Error { message: String },
}

impl AnalysisResult {
    pub fn error(message: impl Into<String>) -> Self {
        AnalysisResult::Error {
            message: message.into(),
        }
    }
}

/// SQL branch result: `{status: success|error, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SqlResult {
    Success { sql_query: String, data: Vec<Row> },
    Error { message: String },
}

impl SqlResult {
    pub fn error(message: impl Into<String>) -> Self {
        SqlResult::Error {
            message: message.into(),
        }
    }
}

/// Result of whichever branch ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    Analysis(AnalysisResult),
    Sql(SqlResult),
}

impl QueryResult {
    /// True for either branch's error record.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            QueryResult::Analysis(AnalysisResult::Error { .. })
                | QueryResult::Sql(SqlResult::Error { .. })
        )
    }
}

impl From<AnalysisResult> for QueryResult {
    fn from(r: AnalysisResult) -> Self {
        QueryResult::Analysis(r)
    }
}

impl From<SqlResult> for QueryResult {
    fn from(r: SqlResult) -> Self {
        QueryResult::Sql(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: Analysis records are tagged by `type`.
    #[test]
    fn analysis_result_wire_format() {
        let chart = AnalysisResult::Chart {
            data: json!("{\"data\": []}"),
        };
        assert_eq!(
            serde_json::to_value(&chart).unwrap(),
            json!({"type": "chart", "data": "{\"data\": []}"})
        );
        assert_eq!(
            serde_json::to_value(AnalysisResult::error("No valid chart data returned")).unwrap(),
            json!({"type": "error", "message": "No valid chart data returned"})
        );
    }

    /// **Scenario**: SQL records are tagged by `status`.
    #[test]
    fn sql_result_wire_format() {
        let ok = SqlResult::Success {
            sql_query: "SELECT * FROM data".into(),
            data: vec![],
        };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "success", "sql_query": "SELECT * FROM data", "data": []})
        );
    }

    /// **Scenario**: The untagged union reads back into the right branch.
    #[test]
    fn query_result_deserializes_by_shape() {
        let a: QueryResult = serde_json::from_value(json!({"type": "error", "message": "m"})).unwrap();
        assert_eq!(a, QueryResult::Analysis(AnalysisResult::error("m")));
        let s: QueryResult = serde_json::from_value(json!({"status": "error", "message": "m"})).unwrap();
        assert_eq!(s, QueryResult::Sql(SqlResult::error("m")));
        assert!(a.is_error() && s.is_error());
    }
}
