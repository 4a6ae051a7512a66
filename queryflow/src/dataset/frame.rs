//! In-memory table: column names plus rows of JSON scalars.
//!
//! Loaded from CSV by [`load_csv`](super::load_csv), produced by SQL execution, and
//! serialized to records (one ordered JSON object per row) for results.

use serde_json::{Map, Value};

use crate::error::AgentError;

/// One record: column name → cell, in column order.
pub type Row = Map<String, Value>;

/// Inferred storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Boolean,
    Text,
}

impl ColumnKind {
    /// SQLite column affinity used when the frame is copied into a database.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Integer | ColumnKind::Boolean => "INTEGER",
            ColumnKind::Real => "REAL",
            ColumnKind::Text => "TEXT",
        }
    }
}

/// Tabular data with named columns. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataFrame {
    /// Builds a frame, checking that every row matches the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, AgentError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(AgentError::InvalidData(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Builds a frame from records. Columns are the union of keys in first-seen
    /// order; missing cells become null.
    pub fn from_records(records: &[Row]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| r.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// Coerces arbitrary JSON into a frame the way a dataframe constructor would:
    ///
    /// - array of objects: one row per object
    /// - array of arrays: positional columns `0..n`
    /// - array of scalars: one column named `0`
    /// - object of arrays (scalars broadcast): one column per key
    /// - object of objects: one column per outer key, one row per inner key
    ///
    /// A bare scalar, or an object holding only scalars, has no row index and is rejected.
    pub fn from_json(value: &Value) -> Result<Self, AgentError> {
        match value {
            Value::Array(items) => Self::from_array(items),
            Value::Object(map) => Self::from_object(map),
            _ => Err(AgentError::InvalidData(
                "DataFrame constructor not properly called!".into(),
            )),
        }
    }

    fn from_array(items: &[Value]) -> Result<Self, AgentError> {
        if items.is_empty() {
            return Ok(Self::default());
        }
        if items.iter().all(Value::is_object) {
            let records: Vec<Row> = items
                .iter()
                .filter_map(|v| v.as_object().cloned())
                .collect();
            return Ok(Self::from_records(&records));
        }
        if items.iter().all(Value::is_array) {
            let width = items
                .iter()
                .filter_map(Value::as_array)
                .map(Vec::len)
                .max()
                .unwrap_or(0);
            let columns = (0..width).map(|i| i.to_string()).collect();
            let rows = items
                .iter()
                .filter_map(Value::as_array)
                .map(|row| {
                    let mut cells = row.clone();
                    cells.resize(width, Value::Null);
                    cells
                })
                .collect();
            return Ok(Self { columns, rows });
        }
        if items.iter().any(|v| v.is_array() || v.is_object()) {
            return Err(AgentError::InvalidData(
                "cannot mix nested and scalar values in one column".into(),
            ));
        }
        Ok(Self {
            columns: vec!["0".to_string()],
            rows: items.iter().map(|v| vec![v.clone()]).collect(),
        })
    }

    fn from_object(map: &Map<String, Value>) -> Result<Self, AgentError> {
        if map.is_empty() {
            return Ok(Self::default());
        }
        let columns: Vec<String> = map.keys().cloned().collect();

        if map.values().all(Value::is_object) {
            let mut index: Vec<String> = Vec::new();
            for inner in map.values().filter_map(Value::as_object) {
                for key in inner.keys() {
                    if !index.iter().any(|k| k == key) {
                        index.push(key.clone());
                    }
                }
            }
            let rows = index
                .iter()
                .map(|idx| {
                    map.values()
                        .map(|col| col.get(idx).cloned().unwrap_or(Value::Null))
                        .collect()
                })
                .collect();
            return Ok(Self { columns, rows });
        }

        let lengths: Vec<usize> = map
            .values()
            .filter_map(Value::as_array)
            .map(Vec::len)
            .collect();
        let Some(&len) = lengths.first() else {
            return Err(AgentError::InvalidData(
                "If using all scalar values, you must pass an index".into(),
            ));
        };
        if lengths.iter().any(|&l| l != len) {
            return Err(AgentError::InvalidData(
                "All arrays must be of the same length".into(),
            ));
        }
        let rows = (0..len)
            .map(|i| {
                map.values()
                    .map(|col| match col {
                        Value::Array(cells) => cells[i].clone(),
                        scalar => scalar.clone(),
                    })
                    .collect()
            })
            .collect();
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows (used for prompt samples).
    pub fn head(&self, n: usize) -> DataFrame {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Rows as ordered records, e.g. `[{"col1": 1, "col2": 3}, ...]`.
    pub fn to_records(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Infers the storage kind of each column from its non-null cells.
    pub fn column_kinds(&self) -> Vec<ColumnKind> {
        (0..self.columns.len())
            .map(|i| {
                let cells = self.rows.iter().map(|r| &r[i]).filter(|v| !v.is_null());
                infer_kind(cells)
            })
            .collect()
    }
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a Value> + Clone) -> ColumnKind {
    if cells.clone().next().is_none() {
        return ColumnKind::Text;
    }
    if cells.clone().all(|v| v.is_i64() || v.is_u64()) {
        ColumnKind::Integer
    } else if cells.clone().all(Value::is_number) {
        ColumnKind::Real
    } else if cells.clone().all(Value::is_boolean) {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    }
}
