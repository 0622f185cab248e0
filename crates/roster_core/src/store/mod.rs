//! Remote store adapter contract and bundled implementations.
//!
//! # Responsibility
//! - Define the four document operations the repository depends on.
//! - Provide an in-memory store and a SQLite-backed document store.
//!
//! # Invariants
//! - `list_all` returns documents in insertion order.
//! - `insert` never accepts a caller-chosen id; ids are adapter-assigned.
//! - `update_by_id` merges fields; a `null` value removes the field.
//! - `delete_by_id` on a missing id succeeds without effect.

use crate::db::DbError;
use crate::model::document::{Document, DocumentFields};
use crate::model::record::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Adapter-level failure for document operations.
#[derive(Debug)]
pub enum StoreError {
    /// Network/auth style failure reported by the backing service.
    Transport(String),
    /// `update_by_id` target does not exist.
    NotFound(RecordId),
    /// Local database failure.
    Db(DbError),
    /// Stored or supplied data cannot be decoded.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "store transport failure: {message}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid document data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "document store requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Transport(_)
            | Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Document database boundary used by the record repository.
pub trait RemoteStore {
    /// Lists every document of `collection`.
    fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>>;
    /// Inserts one document and returns its new id.
    fn insert(&self, collection: &str, fields: &DocumentFields) -> StoreResult<RecordId>;
    /// Merges `fields` into an existing document.
    fn update_by_id(&self, collection: &str, id: &str, fields: &DocumentFields)
        -> StoreResult<()>;
    /// Deletes one document.
    fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<()>;
}

impl<S: RemoteStore + ?Sized> RemoteStore for &S {
    fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        (**self).list_all(collection)
    }

    fn insert(&self, collection: &str, fields: &DocumentFields) -> StoreResult<RecordId> {
        (**self).insert(collection, fields)
    }

    fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: &DocumentFields,
    ) -> StoreResult<()> {
        (**self).update_by_id(collection, id, fields)
    }

    fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<()> {
        (**self).delete_by_id(collection, id)
    }
}
