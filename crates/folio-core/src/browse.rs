//! # Record Cursor
//!
//! Steps through an in-memory list of records one at a time.
//!
//! ```text
//!   [ A ] [ B ] [ C ]
//!           ▲
//!        current         next() at C stays on C
//!                        previous() at A stays on A
//!                        remove_current() jumps back to A
//! ```

/// A cursor over a loaded result set.
#[derive(Debug, Clone)]
pub struct RecordCursor<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> RecordCursor<T> {
    pub fn new(items: Vec<T>) -> Self {
        RecordCursor { items, index: 0 }
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    /// Moves forward. Returns false (and stays put) at the last record.
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.items.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Moves back. Returns false (and stays put) at the first record.
    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// 1-based position of the current record, `None` when empty.
    pub fn position(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.index + 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swaps in a fresh copy of the current record (after a purchase).
    pub fn replace_current(&mut self, item: T) {
        if let Some(slot) = self.items.get_mut(self.index) {
            *slot = item;
        }
    }

    /// Drops the current record and rewinds to the first one.
    pub fn remove_current(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let removed = self.items.remove(self.index);
        self.index = 0;
        Some(removed)
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}
