//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist JSON documents per collection in the `documents` table.
//! - Apply merge updates atomically.
//!
//! # Invariants
//! - `body` is always a JSON object without the document id.
//! - Listing order is insertion order (`seq ASC`).
//! - Merge updates read and write inside one immediate transaction.

use super::{RemoteStore, StoreError, StoreResult};
use crate::db::migrations::latest_version;
use crate::model::document::{merge_fields, strip_nulls, Document, DocumentFields};
use crate::model::record::RecordId;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde_json::Value;
use uuid::Uuid;

/// `RemoteStore` implementation over a migrated SQLite connection.
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// Rejects connections whose schema has not been migrated.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl RemoteStore for SqliteDocumentStore<'_> {
    fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(
            "SELECT doc_id, body
             FROM documents
             WHERE collection = ?1
             ORDER BY seq ASC;",
        )?;
        let mut rows = stmt.query([collection])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("doc_id")?;
            let body: String = row.get("body")?;
            let fields = parse_body(&id, &body)?;
            documents.push(Document::new(id, fields));
        }
        Ok(documents)
    }

    fn insert(&self, collection: &str, fields: &DocumentFields) -> StoreResult<RecordId> {
        let id = Uuid::new_v4().to_string();
        let body = encode_body(&strip_nulls(fields))?;
        self.conn.execute(
            "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3);",
            params![collection, id.as_str(), body],
        )?;
        Ok(id)
    }

    fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: &DocumentFields,
    ) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current: Option<String> = tx
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2;",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Err(StoreError::NotFound(id.to_string()));
        };

        let mut merged = parse_body(id, &current)?;
        merge_fields(&mut merged, fields);
        tx.execute(
            "UPDATE documents SET body = ?3 WHERE collection = ?1 AND doc_id = ?2;",
            params![collection, id, encode_body(&merged)?],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2;",
            params![collection, id],
        )?;
        Ok(())
    }
}

fn parse_body(id: &str, body: &str) -> StoreResult<DocumentFields> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(StoreError::InvalidData(format!(
            "document `{id}` body is not a JSON object"
        ))),
        Err(err) => Err(StoreError::InvalidData(format!(
            "document `{id}` body is not valid JSON: {err}"
        ))),
    }
}

fn encode_body(fields: &DocumentFields) -> StoreResult<String> {
    serde_json::to_string(fields).map_err(|err| StoreError::InvalidData(err.to_string()))
}
