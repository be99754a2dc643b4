//! # Selection-aware ordered collection
//!
//! [`SelectionList`] is an ordered sequence with a single optional cursor.
//! Every list-shaped structure in the crate is built on it: the music library,
//! each playlist and the playlist set.
//!
//! ## Cursor rules
//!
//! - `add` appends and moves the cursor onto the new element
//! - `remove` needs a cursor, removes exactly that element and clears the cursor
//! - `next`/`previous` step the cursor, and running off either end clears it
//! - `reanchor` restores a cursor by value after a structural change made
//!   elsewhere in the list
//!
//! The cursor is kept as a position, so it always designates exactly one
//! element that is present in the sequence.

use crate::error::SelectionError;
use std::fmt;

/// Ordered sequence with at most one selected element.
#[derive(Debug, Clone)]
pub struct SelectionList<T> {
    items: Vec<T>,
    cursor: Option<usize>,
}

impl<T> Default for SelectionList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectionList<T> {
    /// Creates an empty list with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
        }
    }

    /// Appends `item` and selects it.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
        self.cursor = Some(self.items.len() - 1);
    }

    /// Removes the selected element and clears the selection.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected.
    pub fn remove(&mut self) -> Result<T, SelectionError> {
        let index = self.cursor.take().ok_or(SelectionError::NoSelection)?;
        Ok(self.items.remove(index))
    }

    /// Selects the element at `index`.
    ///
    /// # Errors
    ///
    /// [`SelectionError::IndexOutOfBounds`] when `index >= len()`.
    pub fn select(&mut self, index: usize) -> Result<(), SelectionError> {
        if index >= self.items.len() {
            return Err(SelectionError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.cursor = Some(index);
        Ok(())
    }

    /// Clears the selection.
    pub fn deselect(&mut self) {
        self.cursor = None;
    }

    /// Moves the cursor one step towards the end; past the last element the
    /// selection is cleared.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected.
    pub fn next(&mut self) -> Result<(), SelectionError> {
        let index = self.cursor.ok_or(SelectionError::NoSelection)?;
        self.cursor = (index + 1 < self.items.len()).then_some(index + 1);
        Ok(())
    }

    /// Moves the cursor one step towards the start; before the first element
    /// the selection is cleared.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected.
    pub fn previous(&mut self) -> Result<(), SelectionError> {
        let index = self.cursor.ok_or(SelectionError::NoSelection)?;
        self.cursor = index.checked_sub(1);
        Ok(())
    }

    #[must_use]
    pub const fn some_selected(&self) -> bool {
        self.cursor.is_some()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.cursor.map(|index| &self.items[index])
    }

    #[must_use]
    pub const fn index_selected(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Moves the selected element to `target`, shifting the elements in
    /// between one place towards the end. The moved element stays selected.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected and
    /// [`SelectionError::IndexOutOfBounds`] when `target >= len()`.
    pub fn move_selected(&mut self, target: usize) -> Result<(), SelectionError> {
        let index = self.cursor.ok_or(SelectionError::NoSelection)?;
        if target >= self.items.len() {
            return Err(SelectionError::IndexOutOfBounds {
                index: target,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        self.items.insert(target, item);
        self.cursor = Some(target);
        Ok(())
    }
}

impl<T: PartialEq> SelectionList<T> {
    /// Index of the first element equal to `value`.
    #[must_use]
    pub fn position_of(&self, value: &T) -> Option<usize> {
        self.items.iter().position(|item| item == value)
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.position_of(value).is_some()
    }

    /// Equality-based re-anchoring: selects the first element equal to
    /// `saved`, or clears the selection when no such element remains.
    /// Returns whether a cursor was restored.
    pub fn reanchor(&mut self, saved: Option<&T>) -> bool {
        self.cursor = saved.and_then(|value| self.position_of(value));
        self.cursor.is_some()
    }
}

impl<T: PartialEq> PartialEq for SelectionList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cursor == other.cursor && self.items == other.items
    }
}

impl<T: Eq> Eq for SelectionList<T> {}

impl<'a, T> IntoIterator for &'a SelectionList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for SelectionList<T> {
    /// Collects into a list with nothing selected.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            cursor: None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for SelectionList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            write!(f, "\n{i} {item}")?;
            if self.cursor == Some(i) {
                f.write_str(" ->")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five(selected: Option<usize>) -> SelectionList<i32> {
        let mut list: SelectionList<i32> = (1..=5).collect();
        if let Some(index) = selected {
            list.select(index).unwrap();
        }
        list
    }

    #[test]
    fn test_empty_list() {
        let list: SelectionList<i32> = SelectionList::new();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert!(!list.some_selected());
        assert_eq!(list.selected(), None);
        assert_eq!(list.index_selected(), None);
    }

    #[test]
    fn test_add_selects_last() {
        let mut list = SelectionList::new();
        list.add(10);
        assert_eq!(list.selected(), Some(&10));
        assert_eq!(list.index_selected(), Some(0));

        let mut list = five(Some(1));
        list.add(10);
        assert_eq!(list.len(), 6);
        assert_eq!(list.index_selected(), Some(5));
        assert_eq!(list.selected(), Some(&10));
    }

    #[test]
    fn test_remove_selected() {
        let mut list = five(Some(2));
        assert_eq!(list.remove(), Ok(3));
        assert_eq!(list.as_slice(), &[1, 2, 4, 5]);
        assert!(!list.some_selected());

        let mut list = five(Some(4));
        assert_eq!(list.remove(), Ok(5));
        assert_eq!(list.as_slice(), &[1, 2, 3, 4]);

        let mut list = five(Some(0));
        assert_eq!(list.remove(), Ok(1));
        assert_eq!(list.as_slice(), &[2, 3, 4, 5]);
    }

    #[test]
    fn test_remove_without_selection_fails() {
        let mut list = five(None);
        assert_eq!(list.remove(), Err(SelectionError::NoSelection));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_add_remove_sequence_keeps_invariants() {
        let mut list = SelectionList::new();
        for value in 0..20 {
            list.add(value);
            assert!(list.some_selected());
            assert_eq!(list.selected(), Some(&value));
            if value % 3 == 0 {
                let before = list.len();
                list.remove().unwrap();
                assert!(!list.some_selected());
                assert_eq!(list.len(), before - 1);
            }
        }
    }

    #[test]
    fn test_select_out_of_bounds() {
        let mut list = five(Some(1));
        assert_eq!(
            list.select(5),
            Err(SelectionError::IndexOutOfBounds { index: 5, len: 5 })
        );
        // cursor untouched by a failed select
        assert_eq!(list.index_selected(), Some(1));
    }

    #[test]
    fn test_next_runs_off_the_end() {
        let mut list = five(Some(3));
        list.next().unwrap();
        assert_eq!(list.selected(), Some(&5));
        list.next().unwrap();
        assert!(!list.some_selected());
        assert_eq!(list.next(), Err(SelectionError::NoSelection));
    }

    #[test]
    fn test_previous_runs_off_the_start() {
        let mut list = five(Some(1));
        list.previous().unwrap();
        assert_eq!(list.selected(), Some(&1));
        list.previous().unwrap();
        assert!(!list.some_selected());
        assert_eq!(list.previous(), Err(SelectionError::NoSelection));
    }

    #[test]
    fn test_reanchor_by_value() {
        let mut list = five(Some(3));
        let saved = list.selected().copied();
        list.select(1).unwrap();
        list.remove().unwrap();
        assert!(list.reanchor(saved.as_ref()));
        assert_eq!(list.selected(), Some(&4));
        assert_eq!(list.index_selected(), Some(2));

        assert!(!list.reanchor(Some(&42)));
        assert!(!list.some_selected());
        assert!(!list.reanchor(None));
    }

    #[test]
    fn test_move_selected_earlier() {
        let mut list = five(Some(3));
        list.move_selected(1).unwrap();
        assert_eq!(list.as_slice(), &[1, 4, 2, 3, 5]);
        assert_eq!(list.selected(), Some(&4));
        assert!(list.move_selected(5).is_err());
    }

    #[test]
    fn test_equality_includes_cursor() {
        assert_eq!(five(Some(2)), five(Some(2)));
        assert_ne!(five(Some(2)), five(Some(3)));
        assert_ne!(five(None), five(Some(0)));
        assert_eq!(five(None), five(None));
    }

    #[test]
    fn test_display_marks_selection() {
        let mut list: SelectionList<i32> = (1..=3).collect();
        list.select(1).unwrap();
        assert_eq!(list.to_string(), "\n0 1\n1 2 ->\n2 3");
    }
}
