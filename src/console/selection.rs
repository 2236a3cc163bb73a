//! Row selection sync for the store screen.
//!
//! Mirrors the header "select all" checkbox against the row checkboxes with
//! no backing model beyond the current page's row ids: the header is a
//! derived value, checked iff every row is checked and at least one row
//! exists. Selection is advisory; the declared bulk endpoints are never
//! invoked from this controller.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SelectionState {
    rows: Vec<i64>,
    checked: HashSet<i64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the row set after a list render. Any prior selection is
    /// discarded, which also unchecks the header.
    pub fn set_rows(&mut self, rows: Vec<i64>) {
        self.rows = rows;
        self.checked.clear();
    }

    /// Header checkbox toggled: every row follows it.
    pub fn toggle_all(&mut self, checked: bool) {
        if checked {
            self.checked = self.rows.iter().copied().collect();
        } else {
            self.checked.clear();
        }
    }

    /// One row checkbox toggled. Ids not on the current page are ignored.
    pub fn set_row(&mut self, id: i64, checked: bool) {
        if !self.rows.contains(&id) {
            return;
        }
        if checked {
            self.checked.insert(id);
        } else {
            self.checked.remove(&id);
        }
    }

    /// Derived header state.
    pub fn header_checked(&self) -> bool {
        !self.rows.is_empty() && self.checked.len() == self.rows.len()
    }

    pub fn is_checked(&self, id: i64) -> bool {
        self.checked.contains(&id)
    }

    /// Checked ids in row order.
    pub fn selected_ids(&self) -> Vec<i64> {
        self.rows
            .iter()
            .copied()
            .filter(|id| self.checked.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_unchecked_when_empty() {
        let mut selection = SelectionState::new();
        assert!(!selection.header_checked());
        selection.toggle_all(true);
        assert!(!selection.header_checked());
    }

    #[test]
    fn test_toggle_all_checks_every_row() {
        let mut selection = SelectionState::new();
        selection.set_rows(vec![1, 2, 3]);
        selection.toggle_all(true);
        assert!(selection.header_checked());
        assert_eq!(selection.selected_ids(), vec![1, 2, 3]);
        selection.toggle_all(false);
        assert!(selection.selected_ids().is_empty());
    }

    #[test]
    fn test_header_derives_from_rows() {
        let mut selection = SelectionState::new();
        selection.set_rows(vec![1, 2]);
        selection.set_row(1, true);
        assert!(!selection.header_checked());
        selection.set_row(2, true);
        assert!(selection.header_checked());
        selection.set_row(1, false);
        assert!(!selection.header_checked());
    }

    #[test]
    fn test_new_render_resets_selection() {
        let mut selection = SelectionState::new();
        selection.set_rows(vec![1, 2]);
        selection.toggle_all(true);
        selection.set_rows(vec![3, 4]);
        assert!(!selection.header_checked());
        assert!(selection.selected_ids().is_empty());
    }

    #[test]
    fn test_unknown_row_ignored() {
        let mut selection = SelectionState::new();
        selection.set_rows(vec![1]);
        selection.set_row(99, true);
        assert!(selection.selected_ids().is_empty());
    }
}
