use crate::records::PersistedResult;
use crate::session::selection::SelectionSet;

/// State of the saved-result browser: the cached collection fetched from the
/// persistence service, the bulk-delete selection and the detail popup.
///
/// The cache is read-only from the client's point of view; rows only change
/// by replacing the whole collection with a fetched one or by removing the
/// ids of an acknowledged batch delete. Every id in the selection references
/// a row in the cache, and the selection is cleared whenever the cache is
/// replaced.
#[derive(Debug, Default)]
pub struct DatabaseSession {
    results: Vec<PersistedResult>,
    selection: SelectionSet,
    detail: Option<PersistedResult>,
    fetch_seq: u64,
}

impl DatabaseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entering database mode: clears the selection before any response can
    /// land and returns the token for the staged refetch.
    pub fn begin_refresh(&mut self) -> u64 {
        self.selection.clear();
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Applies a settled fetch. `results` is `Some` on success, `None` on
    /// failure; a failure leaves the previous cache untouched. Returns
    /// whether the settlement was current.
    pub fn apply_fetch(&mut self, token: u64, results: Option<Vec<PersistedResult>>) -> bool {
        if token != self.fetch_seq {
            log::debug!("discarding stale result fetch (token {token})");
            return false;
        }
        if let Some(results) = results {
            self.results = results;
            self.selection.clear();
        }
        true
    }

    /// Cached rows in server order.
    pub fn results(&self) -> &[PersistedResult] {
        &self.results
    }

    /// Toggles an id in the selection. Ids not present in the cache are
    /// ignored, keeping the selection consistent with the rows on screen.
    pub fn toggle_select(&mut self, id: i64) {
        if self.results.iter().any(|result| result.id == id) {
            self.selection.toggle(id);
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// The mode switch always clears the selection, in both directions and
    /// regardless of any in-flight fetch.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn open_detail(&mut self, result: PersistedResult) {
        self.detail = Some(result);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&PersistedResult> {
        self.detail.as_ref()
    }

    /// Ids staged for deletion, or `None` when nothing is selected. The
    /// `None` case never reaches the network.
    pub fn delete_request(&self) -> Option<Vec<i64>> {
        if self.selection.is_empty() {
            None
        } else {
            Some(self.selection.ids())
        }
    }

    /// Applies an acknowledged batch delete: removes exactly those rows and
    /// clears the selection. Failure paths never call this, matching the
    /// all-or-nothing delete contract.
    pub fn apply_delete(&mut self, ids: &[i64]) {
        self.results.retain(|result| !ids.contains(&result.id));
        self.selection.clear();
    }
}
