//! Bounded linear undo/redo over full snapshots.
//!
//! - `past` holds older snapshots, oldest at the front
//! - `present` is the live snapshot
//! - `future` holds undone snapshots, next redo at the back
//!
//! Recording a new present discards the redo branch. When `past` grows beyond the capacity the
//! oldest snapshot is evicted first.

use std::collections::VecDeque;

/// Undo steps kept in `past`. The present snapshot is not counted, so up to 51 snapshots are held.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Clone, Debug)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: Vec<T>,
    capacity: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T, capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: Vec::new(),
            capacity,
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len_past(&self) -> usize {
        self.past.len()
    }

    pub fn len_future(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Make `next` the present. Any redo entries are dropped.
    pub fn record(&mut self, next: T) {
        let prev = std::mem::replace(&mut self.present, next);
        self.past.push_back(prev);
        self.evict();
        let dropped = self.future.len();
        self.future.clear();
        tracing::debug!(
            undo_depth = self.past.len(),
            redo_dropped = dropped,
            "history entry recorded"
        );
    }

    /// Step back one snapshot. Returns the new present, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&T> {
        let prev = self.past.pop_back()?;
        let current = std::mem::replace(&mut self.present, prev);
        self.future.push(current);
        tracing::debug!(
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "undo"
        );
        Some(&self.present)
    }

    /// Step forward one snapshot. Returns the new present, or `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop()?;
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        self.evict();
        tracing::debug!(
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "redo"
        );
        Some(&self.present)
    }

    fn evict(&mut self) {
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/manager.rs"]
mod tests;
