//! In-memory SQLite copy of a [`DataFrame`] for executing generated SQL.
//!
//! Each call to [`query_frame`] builds a fresh database, so a statement that
//! mutates or drops the table never leaks into the next request.

use std::sync::Arc;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::{Number, Value};

use super::DataFrame;
use crate::error::AgentError;

/// Name of the table the dataset is loaded into.
pub const TABLE_NAME: &str = "data";

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) | ValueRef::Blob(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Opens an in-memory database holding `frame` as table [`TABLE_NAME`].
pub fn open_in_memory(frame: &DataFrame) -> Result<Connection, AgentError> {
    let mut conn = Connection::open_in_memory()?;
    let column_defs: Vec<String> = frame
        .columns()
        .iter()
        .zip(frame.column_kinds())
        .map(|(name, kind)| format!("{} {}", quote_ident(name), kind.sql_type()))
        .collect();
    conn.execute(
        &format!(
            "CREATE TABLE {} ({})",
            quote_ident(TABLE_NAME),
            column_defs.join(", ")
        ),
        [],
    )?;

    if !frame.columns().is_empty() {
        let placeholders: Vec<String> = (1..=frame.columns().len())
            .map(|i| format!("?{}", i))
            .collect();
        let insert = format!(
            "INSERT INTO {} VALUES ({})",
            quote_ident(TABLE_NAME),
            placeholders.join(", ")
        );
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert)?;
            for row in frame.rows() {
                stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
            }
        }
        tx.commit()?;
    }
    Ok(conn)
}

/// Runs one statement and collects its result set. Statements without a result
/// set (e.g. `UPDATE`) yield an empty frame.
pub fn run_query(conn: &Connection, sql: &str) -> Result<DataFrame, AgentError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(from_sql_ref(row.get_ref(i)?));
        }
        out.push(cells);
    }
    DataFrame::new(columns, out)
}

/// Copies `frame` into a fresh in-memory database and runs `sql` on a blocking thread.
pub async fn query_frame(frame: Arc<DataFrame>, sql: String) -> Result<DataFrame, AgentError> {
    tokio::task::spawn_blocking(move || {
        let conn = open_in_memory(&frame)?;
        run_query(&conn, &sql)
    })
    .await
    .map_err(|e| AgentError::ExecutionFailed(format!("sql task failed: {}", e)))?
}
