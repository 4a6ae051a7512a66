//! CSV discovery and loading.
//!
//! The data directory must hold exactly one `*.csv` file; anything else is a
//! [`ConfigError`] raised before any query runs.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::{Number, Value};

use super::DataFrame;
use crate::error::ConfigError;

/// Finds the single `*.csv` file directly inside `dir`.
///
/// A missing directory counts as zero files.
pub fn discover_csv(dir: &Path) -> Result<PathBuf, ConfigError> {
    let mut found: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
            .collect(),
        Err(_) => Vec::new(),
    };
    if found.len() != 1 {
        return Err(ConfigError::CsvFileCount {
            dir: dir.to_path_buf(),
            found: found.len(),
        });
    }
    Ok(found.remove(0))
}

/// Reads a CSV file with a header row. Column types are inferred per column:
/// integer, then float, then boolean (`true`/`false`, any case), else text.
/// Empty cells become null.
pub fn load_csv(path: &Path) -> Result<DataFrame, ConfigError> {
    let load_err = |message: String| ConfigError::CsvLoad {
        path: path.to_path_buf(),
        message,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| load_err(e.to_string()))?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| load_err(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = dedupe_columns(columns);

    let mut raw: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| load_err(e.to_string()))?;
        raw.push(record.iter().map(str::to_string).collect());
    }

    let parsers: Vec<CellParser> = (0..columns.len())
        .map(|i| CellParser::infer(raw.iter().map(|r| r[i].as_str())))
        .collect();
    let rows = raw
        .iter()
        .map(|r| {
            r.iter()
                .zip(parsers.iter())
                .map(|(cell, parser)| parser.parse(cell))
                .collect()
        })
        .collect();

    DataFrame::new(columns, rows).map_err(|e| load_err(e.to_string()))
}

/// Renames repeated header names to `name.1`, `name.2`, ... in order of appearance,
/// skipping suffixes already taken. Names compare ASCII case-insensitively, as
/// SQLite column names do.
fn dedupe_columns(columns: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    columns
        .into_iter()
        .map(|name| {
            let key = name.to_ascii_lowercase();
            if taken.insert(key.clone()) {
                return name;
            }
            let n = counts.entry(key).or_insert(0);
            loop {
                *n += 1;
                let candidate = format!("{}.{}", name, n);
                if taken.insert(candidate.to_ascii_lowercase()) {
                    return candidate;
                }
            }
        })
        .collect()
}

/// Discovers and loads the dataset in one step.
pub fn load_dataset(dir: &Path) -> Result<DataFrame, ConfigError> {
    let path = discover_csv(dir)?;
    tracing::info!(path = %path.display(), "loading dataset");
    let frame = load_csv(&path)?;
    tracing::debug!(
        rows = frame.len(),
        columns = frame.columns().len(),
        "dataset loaded"
    );
    Ok(frame)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CellParser {
    Integer,
    Float,
    Boolean,
    Text,
}

impl CellParser {
    fn infer<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> Self {
        let present = cells.filter(|c| !c.trim().is_empty());
        if present.clone().all(|c| c.trim().parse::<i64>().is_ok()) {
            CellParser::Integer
        } else if present.clone().all(|c| c.trim().parse::<f64>().is_ok()) {
            CellParser::Float
        } else if present.clone().all(|c| parse_bool(c).is_some()) {
            CellParser::Boolean
        } else {
            CellParser::Text
        }
    }

    fn parse(self, cell: &str) -> Value {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match self {
            CellParser::Integer => trimmed.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            CellParser::Float => trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellParser::Boolean => parse_bool(trimmed).map(Value::Bool).unwrap_or(Value::Null),
            CellParser::Text => Value::String(cell.to_string()),
        }
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
