//! Raw document shape exchanged with store adapters.
//!
//! # Responsibility
//! - Carry an adapter-assigned id next to a JSON field object.
//! - Keep the id out of the field object on both read and write paths.

use serde_json::{Map, Value};

/// Field object of one stored document, keyed by wire field name.
pub type DocumentFields = Map<String, Value>;

/// One document as returned by `RemoteStore::list_all`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Adapter-assigned identifier.
    pub id: String,
    /// Stored fields, excluding `id`.
    pub fields: DocumentFields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: DocumentFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Drops `null` members, which stores treat as "field absent".
pub fn strip_nulls(fields: &DocumentFields) -> DocumentFields {
    fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Merges `patch` into `target`; `null` members remove the key.
pub fn merge_fields(target: &mut DocumentFields, patch: &DocumentFields) {
    for (key, value) in patch {
        if value.is_null() {
            target.remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{merge_fields, strip_nulls, DocumentFields};
    use serde_json::json;

    fn fields(value: serde_json::Value) -> DocumentFields {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn strip_nulls_drops_only_null_members() {
        let stripped = strip_nulls(&fields(json!({"name": "Ann", "email": null, "age": 0})));
        assert_eq!(stripped, fields(json!({"name": "Ann", "age": 0})));
    }

    #[test]
    fn merge_fields_overwrites_and_removes() {
        let mut target = fields(json!({"name": "Ann", "email": "a@b.co", "createdAt": "t0"}));
        merge_fields(&mut target, &fields(json!({"name": "Anne", "email": null})));
        assert_eq!(target, fields(json!({"name": "Anne", "createdAt": "t0"})));
    }
}
