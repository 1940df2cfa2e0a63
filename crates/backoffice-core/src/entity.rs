//! The entity contract the table layer operates on

use serde::{Deserialize, Serialize};

use crate::FieldValue;

/// A not-yet-confirmed change the data layer applied locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOperation {
    Create,
    Update,
    Delete,
    /// A tag the data layer sent that this crate does not know
    #[serde(other)]
    Unknown,
}

impl PendingOperation {
    /// Parse a wire tag. `"none"` and the empty string mean no operation.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "" | "none" => None,
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => Some(Self::Unknown),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Unknown => "unknown",
        }
    }
}

/// Any record a back-office module lists: a lead, a contract, a service order.
///
/// The table layer never looks at domain fields except through [`Entity::field`],
/// keyed by the field names the caller configures for search, sort and filter.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Stable identifier, unique within one collection snapshot
    fn id(&self) -> &str;

    /// Read a field by name. `None` means the entity has no such field.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Locally applied change awaiting server confirmation
    fn pending_operation(&self) -> Option<PendingOperation> {
        None
    }

    /// Whether this entity is an optimistic overlay rather than server state
    fn is_optimistic(&self) -> bool {
        false
    }
}
