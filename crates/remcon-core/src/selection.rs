//! Selection state for the systems table.
//!
//! The selection set is owned explicitly and mutated only through
//! [`SelectionSet::apply`]. Update targets ("all", "current page", one
//! system) are named scopes rather than sentinel ids.

use std::collections::HashSet;

use crate::system::{Identified, SystemId};

/// What a selection update applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionScope {
    /// Every system in the plan.
    All,
    /// The rows currently visible on the page.
    Page,
    /// One specific system.
    System(SystemId),
}

/// A single selection-changing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionUpdate {
    /// Target of the update.
    pub scope: SelectionScope,
    /// Whether the target becomes selected.
    pub selected: bool,
}

impl SelectionUpdate {
    /// Select one system.
    #[must_use]
    pub const fn select(id: SystemId) -> Self {
        Self {
            scope: SelectionScope::System(id),
            selected: true,
        }
    }

    /// Deselect one system.
    #[must_use]
    pub const fn deselect(id: SystemId) -> Self {
        Self {
            scope: SelectionScope::System(id),
            selected: false,
        }
    }

    /// Select the current page.
    #[must_use]
    pub const fn select_page() -> Self {
        Self {
            scope: SelectionScope::Page,
            selected: true,
        }
    }

    /// Deselect the current page.
    #[must_use]
    pub const fn deselect_page() -> Self {
        Self {
            scope: SelectionScope::Page,
            selected: false,
        }
    }

    /// Clear the whole selection.
    #[must_use]
    pub const fn deselect_all() -> Self {
        Self {
            scope: SelectionScope::All,
            selected: false,
        }
    }
}

/// Set of selected system ids.
///
/// Created empty, cleared or replaced only by explicit updates, never
/// implicitly garbage-collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<SystemId>,
}

impl SelectionSet {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether a system is selected.
    #[must_use]
    pub fn contains(&self, id: &SystemId) -> bool {
        self.ids.contains(id)
    }

    /// Iterate the selected ids (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &SystemId> {
        self.ids.iter()
    }

    /// Apply one update.
    ///
    /// Page-scoped updates need the rows currently on the page. `All` with
    /// `selected = true` also operates on the visible rows only; selecting
    /// a whole plan is done by the caller dispatching per-system updates
    /// from a full fetch.
    pub fn apply<R: Identified>(&mut self, update: &SelectionUpdate, page_rows: &[R]) {
        match (&update.scope, update.selected) {
            (SelectionScope::All, false) => self.ids.clear(),
            (SelectionScope::All | SelectionScope::Page, true) => {
                self.ids
                    .extend(page_rows.iter().map(|row| row.system_id().clone()));
            }
            (SelectionScope::Page, false) => {
                for row in page_rows {
                    self.ids.remove(row.system_id());
                }
            }
            (SelectionScope::System(id), true) => {
                self.ids.insert(id.clone());
            }
            (SelectionScope::System(id), false) => {
                self.ids.remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::System;

    fn rows(ids: &[&str]) -> Vec<System> {
        ids.iter()
            .map(|id| System {
                id: SystemId::from(*id),
                hostname: None,
                display_name: None,
                issue_count: None,
            })
            .collect()
    }

    #[test]
    fn page_updates_only_touch_page_rows() {
        let mut selection = SelectionSet::new();
        selection.apply(&SelectionUpdate::select(SystemId::from("z")), &rows(&[]));
        selection.apply(&SelectionUpdate::select_page(), &rows(&["a", "b"]));
        assert_eq!(selection.len(), 3);

        selection.apply(&SelectionUpdate::deselect_page(), &rows(&["a", "b"]));
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(&SystemId::from("z")));
    }

    #[test]
    fn deselect_all_clears_everything() {
        let mut selection = SelectionSet::new();
        selection.apply(&SelectionUpdate::select_page(), &rows(&["a", "b", "c"]));
        selection.apply(&SelectionUpdate::deselect_all(), &rows(&["a"]));
        assert!(selection.is_empty());
    }

    #[test]
    fn per_system_updates_are_idempotent() {
        let mut selection = SelectionSet::new();
        let id = SystemId::from("a");
        selection.apply(&SelectionUpdate::select(id.clone()), &rows(&[]));
        selection.apply(&SelectionUpdate::select(id.clone()), &rows(&[]));
        assert_eq!(selection.len(), 1);

        selection.apply(&SelectionUpdate::deselect(id.clone()), &rows(&[]));
        assert!(!selection.contains(&id));
    }
}
