//! SQLite-backed document store: one row per document, scoped by collection name.
//!
//! Metadata filters run in SQL through `json_extract`; `state_id` lookups use an
//! expression index.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection, ErrorCode};

use super::document_store::{Document, DocumentStore, Metadata, StoreError};

/// Persistent document store in a SQLite file.
///
/// Several collections can share one file; each store instance only sees its own.
/// Every operation runs on the blocking pool.
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
    collection: String,
}

impl SqliteDocumentStore {
    /// Opens (or creates) the database at `path` and the documents table.
    pub fn new(path: impl AsRef<Path>, collection: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?, collection.into())
    }

    /// Non-persistent store, for tests.
    pub fn in_memory(collection: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, collection.into())
    }

    fn with_connection(conn: Connection, collection: String) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                document TEXT NOT NULL,
                metadata TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            );
            CREATE INDEX IF NOT EXISTS documents_state_id
                ON documents (collection, json_extract(metadata, '$.state_id'));",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            collection,
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| StoreError::Storage(format!("connection lock poisoned: {}", e)))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?
    }
}

/// Builds `WHERE` clauses for a metadata filter. Parameter `?1` is the collection;
/// filter values follow as JSON text.
fn filter_clause(filter: &Metadata) -> Result<(String, Vec<String>), StoreError> {
    let mut sql = String::from("collection = ?1");
    let mut values = Vec::with_capacity(filter.len());
    for (key, value) in filter {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StoreError::Storage(format!("unsupported metadata key: {:?}", key)));
        }
        values.push(
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?,
        );
        sql.push_str(&format!(
            " AND json_extract(metadata, '$.{}') = json_extract(?{}, '$')",
            key,
            values.len() + 1
        ));
    }
    Ok((sql, values))
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn add(&self, id: &str, document: &str, metadata: &Metadata) -> Result<(), StoreError> {
        let metadata_json = serde_json::to_string(metadata)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let row = [
            self.collection.clone(),
            id.to_string(),
            document.to_string(),
            metadata_json,
        ];
        self.with_conn(move |conn| {
            match conn.execute(
                "INSERT INTO documents (collection, id, document, metadata) VALUES (?1, ?2, ?3, ?4)",
                params_from_iter(row.iter()),
            ) {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::DuplicateId(row[1].clone()))
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn query(&self, filter: &Metadata, limit: usize) -> Result<Vec<Document>, StoreError> {
        let (clause, values) = filter_clause(filter)?;
        let sql = format!(
            "SELECT id, document, metadata FROM documents WHERE {} LIMIT {}",
            clause,
            i64::try_from(limit).unwrap_or(i64::MAX)
        );
        let mut bound = Vec::with_capacity(values.len() + 1);
        bound.push(self.collection.clone());
        bound.extend(values);

        let rows = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(bound.iter()), |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?;
                let rows = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(id, document, metadata)| {
                let metadata: Metadata = serde_json::from_str(&metadata)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Document {
                    id,
                    document,
                    metadata,
                })
            })
            .collect()
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        let collection = self.collection.clone();
        let ids = ids.to_vec();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt =
                    tx.prepare("DELETE FROM documents WHERE collection = ?1 AND id = ?2")?;
                for id in &ids {
                    stmt.execute(rusqlite::params![collection, id])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }
}
