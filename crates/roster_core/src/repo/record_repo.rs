//! Record repository over a remote document store.
//!
//! # Responsibility
//! - Validate drafts and stamp timestamps before any store call.
//! - Keep an in-memory record list that is rebuilt wholesale from the store
//!   after every successful mutation.
//!
//! # Invariants
//! - A failed store call never changes the in-memory list.
//! - `created_at` is only ever sent on insert.
//! - The busy flag is set exactly while a refresh is in flight.
//! - Missing-id handling is whatever the store reports; the repository does
//!   not check ids on its own.

use crate::clock::{Clock, SystemClock};
use crate::model::record::{Record, RecordDraft, RecordId, RecordInput, ValidationError};
use crate::store::{RemoteStore, StoreError};
use log::{info, warn};
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::Instant;

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "users";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error: local validation or a failed store round-trip.
#[derive(Debug)]
pub enum RepoError {
    /// Draft rejected before any store call.
    Validation(ValidationError),
    /// Store call failed; prior in-memory state is retained.
    Persistence(StoreError),
}

impl RepoError {
    /// Returns whether the failure came from the store reporting a missing id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Persistence(StoreError::NotFound(_)))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "persistence failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

/// Create-or-update request produced by the form controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitIntent {
    Create(RecordInput),
    Update { id: RecordId, input: RecordInput },
}

/// Shared handle on a repository's in-flight refresh flag.
///
/// Clones observe the same flag, so a caller or a store callback can see
/// `true` while `refresh` is running.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    pub fn get(&self) -> bool {
        self.0.get()
    }

    fn set(&self, busy: bool) {
        self.0.set(busy);
    }
}

/// Orchestrates store calls and owns the in-memory record list.
pub struct RecordRepository<S: RemoteStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    collection: String,
    records: Vec<Record>,
    busy: BusyFlag,
    stale: bool,
}

impl<S: RemoteStore> RecordRepository<S> {
    /// Creates a repository over `collection` stamped by the wall clock.
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self::with_clock(store, collection, SystemClock)
    }
}

impl<S: RemoteStore, C: Clock> RecordRepository<S, C> {
    /// Creates a repository with an explicit timestamp source.
    ///
    /// The list starts empty; call [`Self::refresh`] to load it.
    pub fn with_clock(store: S, collection: impl Into<String>, clock: C) -> Self {
        Self {
            store,
            clock,
            collection: collection.into(),
            records: Vec::new(),
            busy: BusyFlag::default(),
            stale: false,
        }
    }

    /// Records from the last successful refresh, in store order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Looks up one record in the in-memory list.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Whether a refresh is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Handle that keeps reporting the busy flag outside `&self` borrows.
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Whether the last post-mutation refresh failed, leaving the list
    /// behind the store.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reloads the whole list from the store.
    ///
    /// On failure the previous list is kept and the error is returned;
    /// there is no retry.
    pub fn refresh(&mut self) -> RepoResult<&[Record]> {
        let started_at = Instant::now();
        self.busy.set(true);
        let loaded = self.load_records();
        self.busy.set(false);

        match loaded {
            Ok(records) => {
                info!(
                    "event=records_refresh module=repo status=ok count={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                self.records = records;
                self.stale = false;
                Ok(&self.records)
            }
            Err(err) => {
                warn!(
                    "event=records_refresh module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Validates and inserts a new record, then refreshes.
    pub fn create(&mut self, draft: &RecordDraft) -> RepoResult<RecordId> {
        let input = draft.validate()?;
        self.create_input(&input)
    }

    /// Validates and merges new field values into record `id`, then
    /// refreshes.
    pub fn update(&mut self, id: &str, draft: &RecordDraft) -> RepoResult<()> {
        let input = draft.validate()?;
        self.update_input(id, &input)
    }

    /// Deletes record `id`, then refreshes.
    pub fn delete(&mut self, id: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        if let Err(err) = self.store.delete_by_id(&self.collection, id) {
            warn!(
                "event=record_delete module=repo status=error id={id} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
        info!(
            "event=record_delete module=repo status=ok id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        self.refresh_after_mutation();
        Ok(())
    }

    /// Persists an already-validated form intent.
    ///
    /// Returns the id of the created or updated record.
    pub fn submit(&mut self, intent: &SubmitIntent) -> RepoResult<RecordId> {
        match intent {
            SubmitIntent::Create(input) => self.create_input(input),
            SubmitIntent::Update { id, input } => {
                self.update_input(id, input)?;
                Ok(id.clone())
            }
        }
    }

    fn create_input(&mut self, input: &RecordInput) -> RepoResult<RecordId> {
        let started_at = Instant::now();
        let now = self.clock.now();
        let id = match self.store.insert(&self.collection, &input.create_fields(&now)) {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    "event=record_create module=repo status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err.into());
            }
        };
        info!(
            "event=record_create module=repo status=ok id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        self.refresh_after_mutation();
        Ok(id)
    }

    fn update_input(&mut self, id: &str, input: &RecordInput) -> RepoResult<()> {
        let started_at = Instant::now();
        let now = self.clock.now();
        if let Err(err) = self
            .store
            .update_by_id(&self.collection, id, &input.update_fields(&now))
        {
            warn!(
                "event=record_update module=repo status=error id={id} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
        info!(
            "event=record_update module=repo status=ok id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        self.refresh_after_mutation();
        Ok(())
    }

    fn load_records(&self) -> Result<Vec<Record>, StoreError> {
        self.store
            .list_all(&self.collection)?
            .iter()
            .map(|document| Record::from_document(document).map_err(StoreError::InvalidData))
            .collect()
    }

    // The mutation already succeeded; a failed reload only marks the list
    // stale.
    fn refresh_after_mutation(&mut self) {
        if self.refresh().is_err() {
            self.stale = true;
        }
    }
}
