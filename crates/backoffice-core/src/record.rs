//! Generic record type validated at the data-layer boundary
//!
//! Payloads from the data-fetching layer are loosely shaped: nested fields may
//! be missing, ids may arrive as numbers, optimistic flags may be absent. All of
//! that is resolved here so the table layer can assume well-formed entities.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{BackofficeError, Entity, FieldValue, PendingOperation, Result};

/// A generic entity: identifier, ordered fields and optimistic flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: String,
    #[serde(default)]
    fields: IndexMap<String, FieldValue>,
    #[serde(default)]
    pending_operation: Option<PendingOperation>,
    #[serde(default)]
    is_optimistic: bool,
}

impl Record {
    /// Create a confirmed record with no fields
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: IndexMap::new(),
            pending_operation: None,
            is_optimistic: false,
        }
    }

    /// Set a field, builder style
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Mark this record as an optimistic overlay for the given operation
    pub fn optimistic(mut self, operation: Option<PendingOperation>) -> Self {
        self.is_optimistic = true;
        self.pending_operation = operation;
        self
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    /// Build a record from a JSON object.
    ///
    /// Accepts `id` as a non-empty string or an integer. `pendingOperation` /
    /// `pending_operation` and `isOptimistic` / `is_optimistic` are read when
    /// present. Array and object fields are stored as NULL.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| BackofficeError::InvalidEntity("expected a JSON object".into()))?;

        let id = match object.get("id") {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(serde_json::Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
            Some(other) => {
                return Err(BackofficeError::InvalidEntity(format!(
                    "unusable id: {}",
                    other
                )));
            }
            None => return Err(BackofficeError::InvalidEntity("missing id".into())),
        };

        let pending_operation = object
            .get("pendingOperation")
            .or_else(|| object.get("pending_operation"))
            .and_then(|v| v.as_str())
            .and_then(PendingOperation::parse);

        let is_optimistic = object
            .get("isOptimistic")
            .or_else(|| object.get("is_optimistic"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let mut fields = IndexMap::with_capacity(object.len());
        for (key, raw) in object {
            if matches!(
                key.as_str(),
                "id" | "pendingOperation" | "pending_operation" | "isOptimistic" | "is_optimistic"
            ) {
                continue;
            }
            fields.insert(key.clone(), json_to_field(key, raw));
        }

        Ok(Self {
            id,
            fields,
            pending_operation,
            is_optimistic,
        })
    }

    /// Parse a JSON array payload, see [`Record::collection_from_json`]
    pub fn collection_from_str(payload: &str) -> Result<Vec<Self>> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        Self::collection_from_json(&value)
    }

    /// Build a collection from a JSON array, rejecting duplicate identifiers.
    pub fn collection_from_json(value: &serde_json::Value) -> Result<Vec<Self>> {
        let items = value
            .as_array()
            .ok_or_else(|| BackofficeError::InvalidEntity("expected a JSON array".into()))?;

        let mut seen = HashSet::with_capacity(items.len());
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let record = Self::from_json(item)?;
            if !seen.insert(record.id.clone()) {
                return Err(BackofficeError::DuplicateId(record.id));
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn json_to_field(key: &str, raw: &serde_json::Value) -> FieldValue {
    match raw {
        serde_json::Value::Null => FieldValue::Null,
        serde_json::Value::Bool(b) => FieldValue::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
        },
        serde_json::Value::String(s) => FieldValue::Text(s.clone()),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            tracing::debug!(field = key, "nested JSON field stored as NULL");
            FieldValue::Null
        }
    }
}

impl Entity for Record {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        self.fields.get(key).cloned()
    }

    fn pending_operation(&self) -> Option<PendingOperation> {
        self.pending_operation
    }

    fn is_optimistic(&self) -> bool {
        self.is_optimistic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_json_reads_flags_and_fields() {
        let record = Record::from_json(&json!({
            "id": "lead-1",
            "name": "Maria",
            "value": 1500,
            "score": 4.5,
            "tags": ["hot"],
            "isOptimistic": true,
            "pendingOperation": "update"
        }))
        .unwrap();

        assert_eq!(record.id(), "lead-1");
        assert!(record.is_optimistic());
        assert_eq!(record.pending_operation(), Some(PendingOperation::Update));
        assert_eq!(record.field("name"), Some(FieldValue::from("Maria")));
        assert_eq!(record.field("value"), Some(FieldValue::Int(1500)));
        assert_eq!(record.field("score"), Some(FieldValue::Float(4.5)));
        assert_eq!(record.field("tags"), Some(FieldValue::Null));
        assert_eq!(record.field("isOptimistic"), None);
    }

    #[test]
    fn test_from_json_numeric_id_and_defaults() {
        let record = Record::from_json(&json!({ "id": 7, "pending_operation": "none" })).unwrap();
        assert_eq!(record.id(), "7");
        assert!(!record.is_optimistic());
        assert_eq!(record.pending_operation(), None);
    }

    #[test]
    fn test_from_json_rejects_bad_ids() {
        assert!(matches!(
            Record::from_json(&json!({ "name": "x" })),
            Err(BackofficeError::InvalidEntity(_))
        ));
        assert!(matches!(
            Record::from_json(&json!({ "id": "  " })),
            Err(BackofficeError::InvalidEntity(_))
        ));
        assert!(matches!(
            Record::from_json(&json!({ "id": null })),
            Err(BackofficeError::InvalidEntity(_))
        ));
        assert!(matches!(
            Record::from_json(&json!("lead")),
            Err(BackofficeError::InvalidEntity(_))
        ));
    }

    #[test]
    fn test_collection_from_str_reports_malformed_payload() {
        let records = Record::collection_from_str(r#"[{"id": "a"}, {"id": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(
            Record::collection_from_str("[{"),
            Err(BackofficeError::Serialization(_))
        ));
    }

    #[test]
    fn test_collection_rejects_duplicate_ids() {
        let result = Record::collection_from_json(&json!([
            { "id": "a" },
            { "id": "b" },
            { "id": "a" }
        ]));
        match result {
            Err(BackofficeError::DuplicateId(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }
}
