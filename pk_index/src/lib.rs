// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PK Index: a small 2D AABB index for feature lookups.
//!
//! Each entry is a bounding box stored under a caller-chosen `usize` slot,
//! typically the position of a feature in its layer. The index answers one
//! kind of query: the `k` boxes nearest to a point.
//!
//! Box distances are only a lower bound on the distance to the geometry a box
//! encloses, so callers that need the true nearest geometry should fetch a few
//! candidates with [`Index::nearest`] and refine them with exact distances.
//!
//! ## Backends
//!
//! - [`backends::FlatVec`]: linear scan, no setup cost.
//! - [`backends::RTreeBackend`]: `rstar` R-tree (feature `backend_rtree`, on by default).
//!   Use [`RTreeBackend::bulk_load`](backends::RTreeBackend::bulk_load) with
//!   [`Index::with_backend`] when a whole layer is indexed at once.
//!
//! Both backends return nearest candidates ordered by box distance and then by
//! slot, so equidistant candidates come back in the same order everywhere.
//!
//! ## Minimal example
//!
//! ```rust
//! use pk_index::{Aabb2D, Index};
//! use pk_index::backends::FlatVec;
//!
//! let mut index: Index<FlatVec> = Index::new();
//! index.insert(0, Aabb2D::new(0.0, 0.0, 10.0, 0.0));
//! index.insert(1, Aabb2D::new(0.0, 5.0, 10.0, 5.0));
//!
//! let hits = index.nearest(3.0, 1.0, 5).unwrap();
//! assert_eq!(hits[0].slot, 0);
//! assert_eq!(hits.len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod types;

pub use backend::{Backend, Neighbor, Neighbors, neighbor_order};
pub use types::Aabb2D;

/// Backend used by [`Index`] when none is named.
#[cfg(feature = "backend_rtree")]
pub type DefaultBackend = backends::RTreeBackend;

/// Backend used by [`Index`] when none is named.
#[cfg(not(feature = "backend_rtree"))]
pub type DefaultBackend = backends::FlatVec;

/// Errors raised by index queries.
///
/// An empty result is not an error; these are queries the index cannot answer.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum IndexError {
    /// The query point has a NaN or infinite coordinate.
    #[error("query point ({x}, {y}) is not finite")]
    NonFiniteQuery {
        /// Query x.
        x: f64,
        /// Query y.
        y: f64,
    },
}

/// A spatial index over slot boxes, generic over its backend.
#[derive(Debug, Default)]
pub struct Index<B: Backend = DefaultBackend> {
    backend: B,
}

impl<B: Backend + Default> Index<B> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            backend: B::default(),
        }
    }
}

impl<B: Backend> Index<B> {
    /// Wrap an already populated backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Insert or replace the box stored under `slot`.
    pub fn insert(&mut self, slot: usize, aabb: Aabb2D) {
        self.backend.insert(slot, aabb);
    }

    /// Up to `k` slots nearest to the point, ordered by box distance then slot.
    ///
    /// Returns an empty list for an empty index or `k == 0`, and an error when
    /// the query point is not finite.
    pub fn nearest(&self, x: f64, y: f64, k: usize) -> Result<Neighbors, IndexError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(IndexError::NonFiniteQuery { x, y });
        }
        Ok(self.backend.nearest(x, y, k))
    }
}
