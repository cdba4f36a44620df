// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction history with an optional size bound.

use std::collections::VecDeque;

/// Past results of a tool, listed newest first.
///
/// A bounded history drops its oldest entry when a push would exceed the
/// capacity.
#[derive(Clone, Debug, PartialEq)]
pub struct History<T> {
    // Oldest at the front, newest at the back.
    entries: VecDeque<T>,
    capacity: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> History<T> {
    /// A history keeping at most `capacity` entries.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// A history with no size bound.
    pub fn unbounded() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: None,
        }
    }

    /// Maximum number of entries, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Record a new entry, returning the entry evicted to make room.
    pub fn push(&mut self, entry: T) -> Option<T> {
        if self.capacity == Some(0) {
            return Some(entry);
        }
        self.entries.push_back(entry);
        match self.capacity {
            Some(cap) if self.entries.len() > cap => self.entries.pop_front(),
            _ => None,
        }
    }

    /// Entry at `index` in newest-first order.
    pub fn get(&self, index: usize) -> Option<&T> {
        let len = self.entries.len();
        if index >= len {
            return None;
        }
        self.entries.get(len - 1 - index)
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.entries.iter().rev()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
