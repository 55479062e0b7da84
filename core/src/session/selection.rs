use std::collections::BTreeSet;

/// Persisted-result ids staged for bulk deletion.
///
/// Plain set semantics; ordering is kept so a delete request always lists
/// ids ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<i64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symmetric toggle: stages the id, or unstages it if already staged.
    pub fn toggle(&mut self, id: i64) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Staged ids in ascending order.
    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }
}
