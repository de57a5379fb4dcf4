use std::collections::HashMap;
use std::hash::Hash;

/// Checked rows of a table, keyed by row id.
///
/// Sparse: rows without an entry are unselected. The selection is never
/// derived from row content and is independent of filters, so it survives
/// sorting and paging until someone clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelection<Id: Eq + Hash> {
    rows: HashMap<Id, bool>,
}

impl<Id: Eq + Hash> Default for RowSelection<Id> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<Id: Eq + Hash + Clone> RowSelection<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = Id>) -> Self {
        Self {
            rows: ids.into_iter().map(|id| (id, true)).collect(),
        }
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        self.rows.get(id).copied().unwrap_or(false)
    }

    /// Unselecting removes the entry to keep the map sparse
    pub fn set(&mut self, id: Id, selected: bool) {
        if selected {
            self.rows.insert(id, true);
        } else {
            self.rows.remove(&id);
        }
    }

    pub fn toggle(&mut self, id: Id) {
        let selected = self.is_selected(&id);
        self.set(id, !selected);
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &Id> {
        self.rows
            .iter()
            .filter_map(|(id, selected)| selected.then_some(id))
    }

    pub fn len(&self) -> usize {
        self.rows.values().filter(|selected| **selected).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// True when `ids` is non-empty and every one of them is selected
    pub fn all_selected(&self, ids: &[Id]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.is_selected(id))
    }

    pub fn select_all(&mut self, ids: &[Id]) {
        for id in ids {
            self.rows.insert(id.clone(), true);
        }
    }

    /// Header checkbox behaviour: unselect `ids` if all are selected,
    /// otherwise select them. Rows outside `ids` are untouched.
    pub fn toggle_all(&mut self, ids: &[Id]) {
        if self.all_selected(ids) {
            for id in ids {
                self.rows.remove(id);
            }
        } else {
            self.select_all(ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_rows_are_unselected() {
        let selection = RowSelection::<i64>::new();
        assert!(!selection.is_selected(&1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_and_set() {
        let mut selection = RowSelection::new();
        selection.toggle(4);
        selection.set(7, true);
        assert!(selection.is_selected(&4));
        assert_eq!(selection.len(), 2);

        selection.toggle(4);
        selection.set(7, false);
        assert!(selection.is_empty());
        assert_eq!(selection, RowSelection::new());
    }

    #[test]
    fn test_toggle_all_only_touches_given_rows() {
        let mut selection = RowSelection::from_ids([100]);
        let page = [1, 2, 3];

        selection.toggle_all(&page);
        assert!(selection.all_selected(&page));
        assert_eq!(selection.len(), 4);

        selection.toggle_all(&page);
        assert!(!selection.is_selected(&2));
        assert!(selection.is_selected(&100));
    }

    #[test]
    fn test_all_selected_is_false_for_empty_page() {
        let selection = RowSelection::from_ids([1, 2]);
        assert!(!selection.all_selected(&[]));
    }

    #[test]
    fn test_selected_ids() {
        let selection = RowSelection::from_ids(["a".to_string(), "b".to_string()]);
        let mut ids: Vec<_> = selection.selected_ids().cloned().collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
