// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-slot holder for the result currently shown on the map.

/// At most one current result.
///
/// Setting a new result replaces the previous one; nothing accumulates.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSlot<T> {
    current: Option<T>,
}

impl<T> Default for MarkerSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> MarkerSlot<T> {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `value`, returning the result it replaces.
    pub fn replace(&mut self, value: T) -> Option<T> {
        self.current.replace(value)
    }

    /// Remove the current result.
    pub fn clear(&mut self) -> Option<T> {
        self.current.take()
    }

    /// The current result.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Returns `true` if nothing is shown.
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
