// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny layers.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, Neighbor, Neighbors, neighbor_order};
use crate::types::Aabb2D;

/// Flat vector backend with linear scans.
#[derive(Default)]
pub struct FlatVec {
    entries: Vec<Option<Aabb2D>>,
}

impl Debug for FlatVec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("FlatVec")
            .field("total_slots", &total)
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}

impl Backend for FlatVec {
    fn insert(&mut self, slot: usize, aabb: Aabb2D) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some(aabb);
    }

    fn nearest(&self, x: f64, y: f64, k: usize) -> Neighbors {
        let mut all: Vec<Neighbor> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(slot, e)| {
                e.as_ref().map(|a| Neighbor {
                    slot,
                    distance_sq: a.distance_sq_to_point(x, y),
                })
            })
            .collect();
        all.sort_by(neighbor_order);
        all.into_iter().take(k).collect()
    }
}
