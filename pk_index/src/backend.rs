// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::types::Aabb2D;

/// A slot returned by a nearest-neighbor query, with its squared box distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Slot the box was inserted under.
    pub slot: usize,
    /// Squared distance from the query point to the slot's box.
    pub distance_sq: f64,
}

/// Candidate list returned by [`Backend::nearest`].
///
/// Sized inline for the small fan-outs the resolvers use.
pub type Neighbors = SmallVec<[Neighbor; 8]>;

/// Ordering used by every backend for nearest results: by box distance, then by slot.
///
/// The slot tie-break makes equidistant candidates come back in the same order
/// regardless of backend or insertion history.
pub fn neighbor_order(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance_sq
        .total_cmp(&b.distance_sq)
        .then(a.slot.cmp(&b.slot))
}

/// Spatial backend abstraction used by [`Index`](crate::Index).
pub trait Backend {
    /// Insert a slot, replacing any box already stored under it.
    fn insert(&mut self, slot: usize, aabb: Aabb2D);

    /// Up to `k` slots whose boxes are closest to the point, ordered by [`neighbor_order`].
    ///
    /// The query point is assumed finite; [`Index`](crate::Index) checks that
    /// before calling into a backend.
    fn nearest(&self, x: f64, y: f64, k: usize) -> Neighbors;
}
