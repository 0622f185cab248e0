//! Core domain logic for the user roster.
//! This crate is the single source of truth for record invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, RosterConfig};
pub use form::controller::{FormController, FormField};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Document, DocumentFields};
pub use model::record::{Record, RecordDraft, RecordId, RecordInput, ValidationError};
pub use repo::record_repo::{BusyFlag, RecordRepository, RepoError, RepoResult, SubmitIntent};
pub use service::roster_service::{RosterPage, RosterService, SessionError, SessionResult};
pub use store::{MemoryStore, RemoteStore, SqliteDocumentStore, StoreError, StoreResult};
pub use view::filter::{apply_view, AgeBucket, SortKey, ViewParseError, ViewState};
pub use view::pagination::{paginate, Page, Pager, DEFAULT_PAGE_SIZE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
