//! Bulk-selection state for the systems table.
//!
//! Everything here is a pure derivation over the current page, the selection
//! set, and the plan-wide total. The async "select all" driver that feeds
//! per-system updates back into the selection lives in `remcon-client`.

use crate::selection::{SelectionSet, SelectionUpdate};
use crate::system::Identified;

/// Tri-state checkbox value for the bulk selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checked {
    /// Every row on the page is selected.
    Checked,
    /// No row on the page is selected.
    Unchecked,
    /// Some rows on the page are selected.
    Indeterminate,
}

/// Compute the tri-state checkbox value over the current page only.
///
/// Empty pages are never `Checked`.
#[must_use]
pub fn calculate_checked<R: Identified>(rows: &[R], selection: &SelectionSet) -> Checked {
    if !rows.is_empty() && rows.iter().all(|row| selection.contains(row.system_id())) {
        return Checked::Checked;
    }
    if rows.iter().any(|row| selection.contains(row.system_id())) {
        return Checked::Indeterminate;
    }
    Checked::Unchecked
}

/// Title shown on the bulk selector toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkTitle {
    /// "`n` selected".
    Count(usize),
    /// An all-systems fetch is in flight; the numeric count is suppressed.
    Loading,
}

/// One entry of the bulk selector menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Clear the selection.
    SelectNone,
    /// Select the rows on the current page.
    SelectPage(usize),
    /// Deselect the rows on the current page.
    DeselectPage(usize),
    /// Select every system in the plan (requires the all-systems fetch).
    SelectAll(u64),
    /// Clear the selection, labeled with the plan total.
    DeselectAll(u64),
}

impl BulkAction {
    /// Menu label for this action.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::SelectNone => "Select none (0)".to_string(),
            Self::SelectPage(count) => format!("Select page ({count})"),
            Self::DeselectPage(count) => format!("Deselect page ({count})"),
            Self::SelectAll(total) => format!("Select all ({total})"),
            Self::DeselectAll(total) => format!("Deselect all ({total})"),
        }
    }

    /// The selection update this action dispatches, if it is synchronous.
    ///
    /// `SelectAll` returns `None`: it is driven by the async all-systems
    /// fetch, which dispatches one per-system update per fetched id.
    #[must_use]
    pub const fn update(&self) -> Option<SelectionUpdate> {
        match self {
            Self::SelectNone | Self::DeselectAll(_) => Some(SelectionUpdate::deselect_all()),
            Self::SelectPage(_) => Some(SelectionUpdate::select_page()),
            Self::DeselectPage(_) => Some(SelectionUpdate::deselect_page()),
            Self::SelectAll(_) => None,
        }
    }
}

/// Inputs the bulk selector derives its state from, captured per render.
#[derive(Debug, Clone, Copy)]
pub struct BulkSelectInput<'a, R: Identified> {
    /// Rows on the current page; `None` while the table has no row data.
    pub rows: Option<&'a [R]>,
    /// The shared selection set.
    pub selection: &'a SelectionSet,
    /// Whether the page finished loading.
    pub loaded: bool,
    /// Total number of systems in the plan, across all pages.
    pub total_count: u64,
    /// Number of systems known locally (used by the page-toggle tie-break).
    pub local_count: usize,
    /// Whether an all-systems fetch source is available.
    pub can_fetch_all: bool,
    /// Whether the all-systems fetch is currently in flight.
    pub loading: bool,
}

/// Derived bulk selector state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSelectState {
    /// The control is disabled while there is no row data at all.
    pub is_disabled: bool,
    /// Tri-state checkbox value.
    pub checked: Checked,
    /// Toggle title.
    pub title: BulkTitle,
    /// Menu entries, in display order.
    pub actions: Vec<BulkAction>,
    /// Every row on the current page is selected.
    pub is_page_selected: bool,
    /// The selection covers the whole plan.
    pub is_all_selected: bool,
}

impl BulkSelectState {
    /// Derive the selector state from one render's inputs.
    #[must_use]
    pub fn derive<R: Identified>(input: &BulkSelectInput<'_, R>) -> Self {
        let selection = input.selection;
        let rows = input.rows.unwrap_or(&[]);

        let is_page_selected =
            !rows.is_empty() && rows.iter().all(|row| selection.contains(row.system_id()));
        let is_all_selected = input.total_count > 0 && selection.len() as u64 == input.total_count;

        // A non-empty selection with no page to compare against still reads
        // as fully checked.
        let checked = if !selection.is_empty() && (!input.loaded || rows.is_empty()) {
            Checked::Checked
        } else {
            calculate_checked(rows, selection)
        };

        let mut actions = vec![BulkAction::SelectNone];
        if input.loaded && !rows.is_empty() {
            actions.push(Self::page_action(input, is_page_selected, rows.len()));
        }
        if input.loaded && input.can_fetch_all {
            actions.push(if is_all_selected {
                BulkAction::DeselectAll(input.total_count)
            } else {
                BulkAction::SelectAll(input.total_count)
            });
        }

        let title = if input.loading {
            BulkTitle::Loading
        } else {
            BulkTitle::Count(selection.len())
        };

        Self {
            is_disabled: input.rows.is_none(),
            checked,
            title,
            actions,
            is_page_selected,
            is_all_selected,
        }
    }

    /// Decide whether the page menu entry selects or deselects.
    ///
    /// When the page is only partially selected, the tie-break compares the
    /// locally-known system count against the selection size: a selection
    /// already covering more than the page reads as "deselect page".
    fn page_action<R: Identified>(
        input: &BulkSelectInput<'_, R>,
        is_page_selected: bool,
        row_count: usize,
    ) -> BulkAction {
        if input.selection.is_empty() {
            BulkAction::SelectPage(row_count)
        } else if is_page_selected {
            BulkAction::DeselectPage(row_count)
        } else if input.local_count > input.selection.len() {
            BulkAction::SelectPage(row_count)
        } else {
            BulkAction::DeselectPage(row_count)
        }
    }

    /// Update dispatched when the checkbox itself is toggled.
    #[must_use]
    pub fn checkbox_update<R: Identified>(
        rows: &[R],
        selection: &SelectionSet,
    ) -> SelectionUpdate {
        if calculate_checked(rows, selection) == Checked::Checked {
            SelectionUpdate::deselect_page()
        } else {
            SelectionUpdate::select_page()
        }
    }
}
