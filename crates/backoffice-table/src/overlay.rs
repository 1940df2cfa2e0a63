//! Presentation of optimistic rows
//!
//! Rows written by a mutation that has not been confirmed yet carry
//! `is_optimistic` and a pending operation. Each combination maps to a row
//! style and decides whether the row still opens the edit form.

use backoffice_core::{Entity, PendingOperation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStyle {
    /// Confirmed row
    #[default]
    None,
    Created,
    Updated,
    /// Being deleted, dimmed and inert
    Deleting,
    /// Optimistic with an unknown operation
    Pending,
}

impl RowStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleting => "deleting",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPresentation {
    pub style: RowStyle,
    /// Whether clicking the row emits an edit event
    pub clickable: bool,
}

impl Default for RowPresentation {
    fn default() -> Self {
        Self {
            style: RowStyle::None,
            clickable: true,
        }
    }
}

/// Resolve how a row is drawn.
///
/// A pending operation on a non-optimistic row is ignored: the row is
/// considered confirmed.
pub fn resolve_row_presentation<E: Entity>(entity: &E) -> RowPresentation {
    if !entity.is_optimistic() {
        return RowPresentation::default();
    }

    let (style, clickable) = match entity.pending_operation() {
        Some(PendingOperation::Create) => (RowStyle::Created, true),
        Some(PendingOperation::Update) => (RowStyle::Updated, true),
        Some(PendingOperation::Delete) => (RowStyle::Deleting, false),
        Some(PendingOperation::Unknown) | None => (RowStyle::Pending, false),
    };
    RowPresentation { style, clickable }
}
