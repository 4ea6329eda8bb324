//! Bounded undo stack of grid snapshots.

use crate::grid::slot_grid::SlotGrid;
use std::collections::VecDeque;

pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// One undoable step: the working grid as it was before the step ran.
///
/// `grid` shares storage with the grid it was taken from; grids are
/// immutable, so holding it costs one reference count.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub description: String,
    pub grid: SlotGrid,
}

#[derive(Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes an entry, returning the oldest one if it had to be evicted.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            return self.entries.pop_front();
        }
        None
    }

    /// Reverts the latest `push`, putting back whatever it evicted.
    pub fn rollback(&mut self, evicted: Option<HistoryEntry>) {
        self.entries.pop_back();
        if let Some(entry) = evicted {
            self.entries.push_front(entry);
        }
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Descriptions, most recent first.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(|e| e.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}
