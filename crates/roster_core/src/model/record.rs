//! Record domain model.
//!
//! # Responsibility
//! - Define the `Record` entity and its raw (`RecordDraft`) and normalized
//!   (`RecordInput`) staging shapes.
//! - Map records to and from store document fields.
//!
//! # Invariants
//! - `id` is assigned by the store adapter and never changes.
//! - A present `email` matches `\S+@\S+\.\S+`.
//! - `created_at` is written once; `updated_at` on every write.

use crate::model::document::{Document, DocumentFields};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque store-assigned identifier.
pub type RecordId = String;

/// Lowest age accepted by the form.
pub const AGE_MIN: u32 = 1;
/// Highest age accepted by the form.
pub const AGE_MAX: u32 = 120;

pub const FIELD_NAME: &str = "name";
pub const FIELD_AGE: &str = "age";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_CREATED_AT: &str = "createdAt";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

/// Canonical user record as held in the repository list.
///
/// Serialized with camelCase wire names to match stored documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub age: u32,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// RFC 3339 timestamp, set once at creation.
    pub created_at: String,
    /// RFC 3339 timestamp, set on every create/update.
    pub updated_at: String,
}

/// Stored field set of one record, without its id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordBody {
    name: String,
    age: u32,
    address: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    created_at: String,
    updated_at: String,
}

impl Record {
    /// Maps one raw store document to a record.
    ///
    /// Rejects documents missing required fields or carrying wrongly typed
    /// values instead of masking them.
    pub fn from_document(document: &Document) -> Result<Self, String> {
        let body: RecordBody = serde_json::from_value(Value::Object(document.fields.clone()))
            .map_err(|err| format!("document `{}`: {err}", document.id))?;

        Ok(Self {
            id: document.id.clone(),
            name: body.name,
            age: body.age,
            address: body.address,
            email: body.email.filter(|value| !value.is_empty()),
            phone: body.phone.filter(|value| !value.is_empty()),
            created_at: body.created_at,
            updated_at: body.updated_at,
        })
    }
}

/// Submit-time validation failures.
///
/// Always local and recoverable: nothing has been sent to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `name`, `age` or `address` is blank after trimming.
    RequiredFieldsMissing,
    /// Non-empty email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Age is not an integer in `[AGE_MIN, AGE_MAX]`.
    InvalidAge(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequiredFieldsMissing => write!(f, "required fields missing"),
            Self::InvalidEmail => write!(f, "invalid email"),
            Self::InvalidAge(value) => write!(
                f,
                "invalid age `{value}`; expected an integer between {AGE_MIN} and {AGE_MAX}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Raw, unvalidated form values for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub name: String,
    pub age: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl RecordDraft {
    /// Copies a record into draft form; absent optionals become `""`.
    pub fn from_record(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            age: record.age.to_string(),
            address: record.address.clone(),
            email: record.email.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
        }
    }

    /// Validates and normalizes the draft.
    ///
    /// Rules run in a fixed order and stop at the first failure:
    /// required fields, then email shape, then age range.
    pub fn validate(&self) -> Result<RecordInput, ValidationError> {
        let name = self.name.trim();
        let age = self.age.trim();
        let address = self.address.trim();
        if name.is_empty() || age.is_empty() || address.is_empty() {
            return Err(ValidationError::RequiredFieldsMissing);
        }

        // Only a truly empty email skips the shape check; whitespace is
        // checked and fails.
        if !self.email.is_empty() && !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        let email = self.email.trim();

        let age = parse_age(age)?;

        Ok(RecordInput {
            name: name.to_string(),
            age,
            address: address.to_string(),
            email: non_empty(email),
            phone: non_empty(self.phone.trim()),
        })
    }
}

/// Validated, normalized record fields ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInput {
    pub name: String,
    pub age: u32,
    pub address: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl RecordInput {
    /// Document fields for an insert; both timestamps set to `now`.
    pub fn create_fields(&self, now: &str) -> DocumentFields {
        let mut fields = self.editable_fields();
        fields.insert(FIELD_CREATED_AT.to_string(), Value::from(now));
        fields.insert(FIELD_UPDATED_AT.to_string(), Value::from(now));
        fields
    }

    /// Document fields for a merge update; `createdAt` is never sent.
    ///
    /// Cleared optionals are sent as `null` so the store drops them.
    pub fn update_fields(&self, now: &str) -> DocumentFields {
        let mut fields = self.editable_fields();
        fields.insert(FIELD_UPDATED_AT.to_string(), Value::from(now));
        fields
    }

    fn editable_fields(&self) -> DocumentFields {
        let mut fields = DocumentFields::new();
        fields.insert(FIELD_NAME.to_string(), Value::from(self.name.as_str()));
        fields.insert(FIELD_AGE.to_string(), Value::from(self.age));
        fields.insert(FIELD_ADDRESS.to_string(), Value::from(self.address.as_str()));
        fields.insert(FIELD_EMAIL.to_string(), optional_value(self.email.as_deref()));
        fields.insert(FIELD_PHONE.to_string(), optional_value(self.phone.as_deref()));
        fields
    }
}

/// Returns whether `value` has the loose `local@domain.tld` shape.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn parse_age(value: &str) -> Result<u32, ValidationError> {
    match value.parse::<u32>() {
        Ok(age) if (AGE_MIN..=AGE_MAX).contains(&age) => Ok(age),
        _ => Err(ValidationError::InvalidAge(value.to_string())),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn optional_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, Record, RecordDraft, ValidationError};
    use crate::model::document::Document;
    use serde_json::json;

    fn draft(name: &str, age: &str, address: &str) -> RecordDraft {
        RecordDraft {
            name: name.to_string(),
            age: age.to_string(),
            address: address.to_string(),
            ..RecordDraft::default()
        }
    }

    #[test]
    fn email_shape_matches_loose_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
    }

    #[test]
    fn required_check_runs_before_email_check() {
        let mut input = draft("  ", "30", "X");
        input.email = "broken".to_string();
        assert_eq!(
            input.validate().unwrap_err(),
            ValidationError::RequiredFieldsMissing
        );
    }

    #[test]
    fn email_check_runs_before_age_check() {
        let mut input = draft("Ann", "abc", "X");
        input.email = "broken".to_string();
        assert_eq!(input.validate().unwrap_err(), ValidationError::InvalidEmail);
    }

    #[test]
    fn age_outside_form_range_is_rejected() {
        for age in ["0", "121", "-3", "30.5", "thirty"] {
            let err = draft("Ann", age, "X").validate().unwrap_err();
            assert_eq!(err, ValidationError::InvalidAge(age.to_string()));
        }
    }

    #[test]
    fn validate_trims_and_normalizes_optionals() {
        let mut input = draft(" Ann ", " 30 ", " Main St ");
        input.email = " ann@example.com ".to_string();
        input.phone = "   ".to_string();

        let normalized = input.validate().unwrap();
        assert_eq!(normalized.name, "Ann");
        assert_eq!(normalized.age, 30);
        assert_eq!(normalized.address, "Main St");
        assert_eq!(normalized.email.as_deref(), Some("ann@example.com"));
        assert_eq!(normalized.phone, None);
    }

    #[test]
    fn whitespace_only_email_is_invalid() {
        let mut input = draft("Ann", "30", "X");
        input.email = "   ".to_string();
        assert_eq!(input.validate().unwrap_err(), ValidationError::InvalidEmail);
    }

    #[test]
    fn record_serializes_to_stored_document_shape() {
        let record = Record {
            id: "rec-1".to_string(),
            name: "Ann".to_string(),
            age: 30,
            address: "X".to_string(),
            email: Some("a@b.co".to_string()),
            phone: None,
            created_at: "t0".to_string(),
            updated_at: "t1".to_string(),
        };

        let mut value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "rec-1",
                "name": "Ann",
                "age": 30,
                "address": "X",
                "email": "a@b.co",
                "createdAt": "t0",
                "updatedAt": "t1"
            })
        );

        let fields = value.as_object_mut().unwrap();
        let id = fields.remove("id").unwrap();
        let document = Document::new(id.as_str().unwrap(), fields.clone());
        assert_eq!(Record::from_document(&document).unwrap(), record);

        let decoded: Record = serde_json::from_value(serde_json::to_value(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
    }
}
