//! Draft form controller.
//!
//! # Responsibility
//! - Hold raw draft field values and the edit-mode marker.
//! - Turn a valid draft into a create or update intent.
//!
//! # Invariants
//! - An invalid draft is never handed to the repository.
//! - Draft and edit mode are cleared only after a successful submit or an
//!   explicit cancel; a failed submit keeps them for correction.

use crate::clock::Clock;
use crate::model::record::{Record, RecordDraft, RecordId, ValidationError};
use crate::repo::record_repo::{RecordRepository, RepoResult, SubmitIntent};
use crate::store::RemoteStore;

/// Editable draft field selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Age,
    Address,
    Email,
    Phone,
}

/// Form state: draft values, edit target and visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormController {
    draft: RecordDraft,
    editing_id: Option<RecordId>,
    visible: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &RecordDraft {
        &self.draft
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows an empty form in create mode.
    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Replaces one draft field with the raw input value.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.draft.name = value,
            FormField::Age => self.draft.age = value,
            FormField::Address => self.draft.address = value,
            FormField::Email => self.draft.email = value,
            FormField::Phone => self.draft.phone = value,
        }
    }

    /// Enters edit mode for `record`, copying every field into the draft.
    pub fn load_for_edit(&mut self, record: &Record) {
        self.draft = RecordDraft::from_record(record);
        self.editing_id = Some(record.id.clone());
        self.visible = true;
    }

    /// Clears the draft and leaves edit mode without persisting.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Validates the draft and builds the matching intent.
    ///
    /// Does not touch form state.
    pub fn prepare_submit(&self) -> Result<SubmitIntent, ValidationError> {
        let input = self.draft.validate()?;
        Ok(match &self.editing_id {
            Some(id) => SubmitIntent::Update {
                id: id.clone(),
                input,
            },
            None => SubmitIntent::Create(input),
        })
    }

    /// Validates, hands the intent to `repo`, and clears the form on success.
    ///
    /// Returns the id of the created or updated record.
    pub fn submit<S: RemoteStore, C: Clock>(
        &mut self,
        repo: &mut RecordRepository<S, C>,
    ) -> RepoResult<RecordId> {
        let intent = self.prepare_submit()?;
        let id = repo.submit(&intent)?;
        self.reset();
        Ok(id)
    }

    fn reset(&mut self) {
        self.draft = RecordDraft::default();
        self.editing_id = None;
        self.visible = false;
    }
}
