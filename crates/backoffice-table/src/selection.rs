//! Row selection keyed by entity identity
//!
//! Selection stores entity ids, never positions, so it survives re-sorting,
//! pagination and collection refreshes. Row indices coming from the view are
//! resolved to ids at the moment of the click.

use backoffice_core::Entity;
use indexmap::IndexSet;

/// Tri-state of the "select all" checkbox in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderCheckState {
    #[default]
    None,
    Partial,
    All,
}

/// Set of selected entity ids, kept in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    selected: IndexSet<String>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in the order they were selected
    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Toggle one id; returns whether it is now selected
    pub fn toggle_id(&mut self, id: &str) -> bool {
        if self.selected.shift_remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Toggle the entity at `index` in `view`. Out-of-range indices are
    /// ignored and return `None`.
    pub fn toggle_row<E: Entity>(&mut self, index: usize, view: &[&E]) -> Option<bool> {
        let entity = view.get(index)?;
        Some(self.toggle_id(entity.id()))
    }

    /// Select every entity in `view`, or clear them all if every one of them
    /// is already selected. Selections outside `view` are left alone.
    pub fn toggle_all<E: Entity>(&mut self, view: &[&E]) {
        if view.is_empty() {
            return;
        }
        let all_selected = view.iter().all(|e| self.is_selected(e.id()));
        if all_selected {
            for entity in view {
                self.selected.shift_remove(entity.id());
            }
        } else {
            for entity in view {
                self.selected.insert(entity.id().to_string());
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop ids that no longer exist in the collection
    pub fn retain_existing<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let existing: IndexSet<&str> = ids.into_iter().collect();
        self.selected.retain(|id| existing.contains(id.as_str()));
    }

    /// Number of entities in `view` that are selected
    pub fn selected_in_view<E: Entity>(&self, view: &[&E]) -> usize {
        view.iter().filter(|e| self.is_selected(e.id())).count()
    }

    pub fn header_state<E: Entity>(&self, view: &[&E]) -> HeaderCheckState {
        let count = self.selected_in_view(view);
        if count == 0 {
            HeaderCheckState::None
        } else if count == view.len() {
            HeaderCheckState::All
        } else {
            HeaderCheckState::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::Record;
    use pretty_assertions::assert_eq;

    fn orders() -> Vec<Record> {
        (1..=4)
            .map(|i| Record::new(format!("os-{}", i)).with_field("number", i))
            .collect()
    }

    #[test]
    fn test_toggle_row_resolves_identity() {
        let data = orders();
        let mut view: Vec<&Record> = data.iter().collect();
        let mut selection = RowSelection::new();

        assert_eq!(selection.toggle_row(1, &view), Some(true));
        view.reverse();
        // os-2 moved to index 2 after the re-sort, still selected
        assert!(selection.is_selected(view[2].id()));
        assert_eq!(selection.toggle_row(9, &view), None);
        assert_eq!(selection.toggle_row(2, &view), Some(false));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_selects_then_clears() {
        let data = orders();
        let view: Vec<&Record> = data.iter().collect();
        let mut selection = RowSelection::new();

        selection.toggle_id("os-3");
        assert_eq!(selection.header_state(&view), HeaderCheckState::Partial);

        selection.toggle_all(&view);
        assert_eq!(selection.len(), 4);
        assert_eq!(selection.header_state(&view), HeaderCheckState::All);

        selection.toggle_all(&view);
        assert!(selection.is_empty());
        assert_eq!(selection.header_state(&view), HeaderCheckState::None);
    }

    #[test]
    fn test_retain_existing() {
        let mut selection = RowSelection::new();
        selection.toggle_id("os-1");
        selection.toggle_id("os-2");
        selection.toggle_id("os-3");
        selection.retain_existing(["os-1", "os-3", "os-9"]);
        assert_eq!(selection.selected_ids(), vec!["os-1", "os-3"]);
    }

    #[test]
    fn test_selected_ids_keep_selection_order() {
        let mut selection = RowSelection::new();
        selection.toggle_id("b");
        selection.toggle_id("a");
        selection.toggle_id("c");
        selection.toggle_id("a");
        assert_eq!(selection.selected_ids(), vec!["b", "c"]);
    }
}
