//! Async driver for the bulk selector.
//!
//! Owns the shared selection set and the in-flight flag for the all-systems
//! fetch. Every selection write flows through [`remcon_core::SelectionSet::apply`];
//! sequential event handling is the only concurrency, so a `parking_lot`
//! lock is all the coordination needed.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use remcon_core::{
    BulkAction, BulkSelectInput, BulkSelectState, Identified, SelectionSet, SelectionUpdate, System,
};

use crate::error::ClientResult;

/// Clears the in-flight flag when the all-systems fetch ends, error or not.
struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Bulk-selection controller for one systems table.
#[derive(Debug, Clone, Default)]
pub struct BulkSelectController {
    selection: Arc<RwLock<SelectionSet>>,
    loading: Arc<AtomicBool>,
}

impl BulkSelectController {
    /// Create a controller with an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current selection.
    #[must_use]
    pub fn selection(&self) -> SelectionSet {
        self.selection.read().clone()
    }

    /// Number of selected systems.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selection.read().len()
    }

    /// Whether the all-systems fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Derive the selector state for the current render.
    #[must_use]
    pub fn state<R: Identified>(
        &self,
        rows: Option<&[R]>,
        loaded: bool,
        total_count: u64,
        local_count: usize,
        can_fetch_all: bool,
    ) -> BulkSelectState {
        let selection = self.selection.read();
        BulkSelectState::derive(&BulkSelectInput {
            rows,
            selection: &selection,
            loaded,
            total_count,
            local_count,
            can_fetch_all,
            loading: self.is_loading(),
        })
    }

    /// Apply one selection update against the current page.
    pub fn dispatch<R: Identified>(&self, update: &SelectionUpdate, page_rows: &[R]) {
        self.selection.write().apply(update, page_rows);
    }

    /// Run a synchronous menu action. Returns `false` for [`BulkAction::SelectAll`],
    /// which must go through [`Self::select_all`] instead.
    pub fn run_action<R: Identified>(&self, action: &BulkAction, page_rows: &[R]) -> bool {
        action.update().is_some_and(|update| {
            self.dispatch(&update, page_rows);
            true
        })
    }

    /// Select every system of the plan.
    ///
    /// Flips the in-flight flag, runs the provided all-systems fetch, and
    /// dispatches one per-system update per fetched id. The flag is cleared
    /// by a drop guard even when the fetch fails; the error itself is not
    /// handled here and propagates to the caller.
    pub async fn select_all<F, Fut>(&self, fetch_all: F) -> ClientResult<usize>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<Vec<System>>>,
    {
        self.loading.store(true, Ordering::SeqCst);
        let _guard = LoadingGuard(Arc::clone(&self.loading));

        let all = fetch_all().await?;
        let mut selection = self.selection.write();
        for system in &all {
            selection.apply::<System>(&SelectionUpdate::select(system.id.clone()), &[]);
        }
        Ok(all.len())
    }
}
