//! Prompt helpers shared by the LLM-backed agents: dataset description and
//! extraction of SQL / JSON from model replies.

use serde_json::Value;

use crate::dataset::sqlite::TABLE_NAME;
use crate::dataset::DataFrame;
use crate::error::AgentError;

/// Describes the dataset table: column names with SQLite types, then `n_samples` rows as JSON.
pub(crate) fn describe_frame(frame: &DataFrame, n_samples: usize) -> String {
    let mut out = format!("Table `{}` has {} rows and columns:\n", TABLE_NAME, frame.len());
    for (name, kind) in frame.columns().iter().zip(frame.column_kinds()) {
        out.push_str(&format!("- {} ({})\n", name, kind.sql_type()));
    }
    if n_samples > 0 && !frame.is_empty() {
        let sample = serde_json::to_string(&frame.head(n_samples).to_records()).unwrap_or_default();
        out.push_str(&format!("Sample rows: {}\n", sample));
    }
    out
}

/// Returns the body of the first fenced code block, or the whole text when there is none.
fn strip_code_fences(text: &str) -> &str {
    let Some(start) = text.find("```") else {
        return text.trim();
    };
    let after = &text[start + 3..];
    // Skip the language tag line, e.g. ```sql
    let body = match after.find('\n') {
        Some(nl) => &after[nl + 1..],
        None => after,
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Extracts a single SQL statement from a model reply.
pub fn extract_sql(reply: &str) -> Result<String, AgentError> {
    let sql = strip_code_fences(reply).trim().trim_end_matches(';').trim();
    if sql.is_empty() {
        return Err(AgentError::ExecutionFailed("model returned no SQL".into()));
    }
    Ok(sql.to_string())
}

/// Extracts a JSON value from a model reply, tolerating code fences and surrounding prose.
pub fn extract_json(reply: &str) -> Result<Value, AgentError> {
    let body = strip_code_fences(reply);
    if let Ok(v) = serde_json::from_str(body) {
        return Ok(v);
    }
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&body[start..=end])
            .map_err(|e| AgentError::ExecutionFailed(format!("model returned invalid JSON: {}", e))),
        _ => Err(AgentError::ExecutionFailed(
            "model returned no JSON object".into(),
        )),
    }
}
