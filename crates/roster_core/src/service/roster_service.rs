//! Roster session use-case service.
//!
//! # Responsibility
//! - Combine repository, view pipeline, pager and form into the flows a
//!   roster screen drives: browse, search, edit, confirm-delete.
//!
//! # Invariants
//! - The page resets to 1 whenever the visible list can change: new
//!   search/bucket/sort, or any successful refresh or mutation.
//! - Deletes only happen through `confirm_delete` on a pending request.

use crate::clock::{Clock, SystemClock};
use crate::form::controller::FormController;
use crate::model::record::{Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoError};
use crate::store::RemoteStore;
use crate::view::filter::{AgeBucket, SortKey, ViewState};
use crate::view::pagination::Pager;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Session-level error.
#[derive(Debug)]
pub enum SessionError {
    Repo(RepoError),
    /// Id is not in the loaded list.
    UnknownRecord(RecordId),
    /// `confirm_delete` without a pending request.
    NoPendingDelete,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::UnknownRecord(id) => write!(f, "record not loaded: {id}"),
            Self::NoPendingDelete => write!(f, "no delete awaiting confirmation"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::UnknownRecord(_) | Self::NoPendingDelete => None,
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// One rendered page of the visible list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPage<'a> {
    pub records: Vec<&'a Record>,
    /// 1-based page shown.
    pub page: usize,
    pub total_pages: usize,
    /// Records passing search and bucket, across all pages.
    pub total_matches: usize,
}

/// Screen-level state over one record repository.
pub struct RosterService<S: RemoteStore, C: Clock = SystemClock> {
    repo: RecordRepository<S, C>,
    view: ViewState,
    pager: Pager,
    form: FormController,
    pending_delete: Option<RecordId>,
}

impl<S: RemoteStore, C: Clock> RosterService<S, C> {
    pub fn new(repo: RecordRepository<S, C>, page_size: usize) -> Self {
        Self {
            repo,
            view: ViewState::default(),
            pager: Pager::new(page_size),
            form: FormController::new(),
            pending_delete: None,
        }
    }

    pub fn repository(&self) -> &RecordRepository<S, C> {
        &self.repo
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Mutable form access for field edits.
    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    /// Current search, bucket and sort selection.
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// 1-based page currently shown.
    pub fn page(&self) -> usize {
        self.pager.page()
    }

    /// Count of every loaded record, before filtering.
    pub fn total_records(&self) -> usize {
        self.repo.records().len()
    }

    /// Reloads the record list from the store.
    pub fn load(&mut self) -> SessionResult<()> {
        self.repo.refresh()?;
        self.pager.reset();
        Ok(())
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.view.search = search.into();
        self.pager.reset();
    }

    pub fn set_bucket(&mut self, bucket: AgeBucket) {
        self.view.bucket = bucket;
        self.pager.reset();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.sort = sort;
        self.pager.reset();
    }

    /// Filtered and sorted records, all pages.
    pub fn visible(&self) -> Vec<&Record> {
        self.view.apply(self.repo.records())
    }

    /// Total pages of the current visible list.
    pub fn total_pages(&self) -> usize {
        self.pager.slice(&self.visible()).total_pages
    }

    /// Records on the current page, with page metadata.
    pub fn current_page(&self) -> RosterPage<'_> {
        let visible = self.visible();
        let page = self.pager.slice(&visible);
        RosterPage {
            records: page.items.to_vec(),
            page: page.page,
            total_pages: page.total_pages,
            total_matches: page.total_items,
        }
    }

    pub fn next_page(&mut self) -> usize {
        let total = self.visible().len();
        self.pager.next(total)
    }

    pub fn prev_page(&mut self) -> usize {
        self.pager.prev()
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        let total = self.visible().len();
        self.pager.go_to(page, total)
    }

    /// Shows the form in create mode.
    pub fn open_form(&mut self) {
        self.form.open();
    }

    /// Loads record `id` into the form in edit mode.
    pub fn edit(&mut self, id: &str) -> SessionResult<()> {
        let record = self
            .repo
            .find(id)
            .ok_or_else(|| SessionError::UnknownRecord(id.to_string()))?;
        self.form.load_for_edit(record);
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// Submits the form; on success the list is reloaded and the page reset.
    pub fn submit_form(&mut self) -> SessionResult<RecordId> {
        let id = self.form.submit(&mut self.repo)?;
        self.pager.reset();
        Ok(id)
    }

    /// Asks for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: &str) -> SessionResult<&Record> {
        let record = self
            .repo
            .find(id)
            .ok_or_else(|| SessionError::UnknownRecord(id.to_string()))?;
        self.pending_delete = Some(record.id.clone());
        Ok(record)
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Deletes the pending record.
    ///
    /// The request is consumed even when the store call fails.
    pub fn confirm_delete(&mut self) -> SessionResult<RecordId> {
        let id = self
            .pending_delete
            .take()
            .ok_or(SessionError::NoPendingDelete)?;
        self.repo.delete(&id)?;
        if self.form.editing_id() == Some(id.as_str()) {
            self.form.cancel();
        }
        self.pager.reset();
        Ok(id)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}
