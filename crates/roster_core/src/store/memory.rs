//! In-memory document store.
//!
//! Single-threaded: interior mutability goes through `RefCell`, so the
//! `RemoteStore` methods can keep `&self` receivers.

use super::{RemoteStore, StoreError, StoreResult};
use crate::model::document::{merge_fields, strip_nulls, Document, DocumentFields};
use crate::model::record::RecordId;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use uuid::Uuid;

/// In-memory `RemoteStore` with failure simulation switches.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RefCell<BTreeMap<String, Vec<Document>>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    calls: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `list_all` fail with a transport error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Makes `insert`, `update_by_id` and `delete_by_id` fail with a
    /// transport error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of adapter operations attempted so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    /// Stores a document verbatim under a caller-chosen id.
    ///
    /// Seeds fixtures, including malformed ones; bypasses failure switches.
    pub fn seed(&self, collection: &str, document: Document) {
        self.collections
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Number of documents currently stored in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .borrow()
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn begin_read(&self) -> StoreResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_reads.get() {
            return Err(StoreError::Transport("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn begin_write(&self) -> StoreResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_writes.get() {
            return Err(StoreError::Transport("simulated write failure".to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.begin_read()?;
        Ok(self
            .collections
            .borrow()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn insert(&self, collection: &str, fields: &DocumentFields) -> StoreResult<RecordId> {
        self.begin_write()?;
        let id = Uuid::new_v4().to_string();
        self.seed(collection, Document::new(id.clone(), strip_nulls(fields)));
        Ok(id)
    }

    fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: &DocumentFields,
    ) -> StoreResult<()> {
        self.begin_write()?;
        let mut collections = self.collections.borrow_mut();
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        merge_fields(&mut document.fields, fields);
        Ok(())
    }

    fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.begin_write()?;
        if let Some(documents) = self.collections.borrow_mut().get_mut(collection) {
            documents.retain(|document| document.id != id);
        }
        Ok(())
    }
}
