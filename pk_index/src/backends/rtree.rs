// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree backend on top of `rstar`, for layers with many features.

use alloc::vec::Vec;
use core::fmt::Debug;

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::RTree;

use crate::backend::{Backend, Neighbor, Neighbors, neighbor_order};
use crate::types::Aabb2D;

type Entry = GeomWithData<Rectangle<[f64; 2]>, usize>;

fn entry(slot: usize, aabb: &Aabb2D) -> Entry {
    GeomWithData::new(
        Rectangle::from_corners([aabb.min_x, aabb.min_y], [aabb.max_x, aabb.max_y]),
        slot,
    )
}

/// R-tree backend.
///
/// Slot boxes are mirrored in a side table so that inserting over a slot can
/// remove the exact tree entry it replaces.
#[derive(Default)]
pub struct RTreeBackend {
    tree: RTree<Entry>,
    boxes: Vec<Option<Aabb2D>>,
}

impl RTreeBackend {
    /// Bulk-load a backend from `(slot, box)` pairs.
    ///
    /// Faster than repeated inserts when a whole layer is indexed at once.
    pub fn bulk_load<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (usize, Aabb2D)>,
    {
        let mut boxes = Vec::new();
        let mut entries = Vec::new();
        for (slot, aabb) in items {
            if boxes.len() <= slot {
                boxes.resize_with(slot + 1, || None);
            }
            if boxes[slot].replace(aabb).is_some() {
                entries.retain(|e: &Entry| e.data != slot);
            }
            entries.push(entry(slot, &aabb));
        }
        Self {
            tree: RTree::bulk_load(entries),
            boxes,
        }
    }
}

impl Debug for RTreeBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTreeBackend")
            .field("total_slots", &self.boxes.len())
            .field("alive", &self.tree.size())
            .finish_non_exhaustive()
    }
}

impl Backend for RTreeBackend {
    fn insert(&mut self, slot: usize, aabb: Aabb2D) {
        if self.boxes.len() <= slot {
            self.boxes.resize_with(slot + 1, || None);
        }
        if let Some(old) = self.boxes[slot].replace(aabb) {
            self.tree.remove(&entry(slot, &old));
        }
        self.tree.insert(entry(slot, &aabb));
    }

    fn nearest(&self, x: f64, y: f64, k: usize) -> Neighbors {
        if k == 0 {
            return Neighbors::new();
        }
        // Keep pulling past `k` while distances tie with the k-th one, so the
        // slot tie-break sees every equidistant candidate.
        let mut out: Vec<Neighbor> = Vec::with_capacity(k);
        for (e, distance_sq) in self.tree.nearest_neighbor_iter_with_distance_2(&[x, y]) {
            if out.len() >= k && out.last().is_some_and(|last| distance_sq > last.distance_sq) {
                break;
            }
            out.push(Neighbor {
                slot: e.data,
                distance_sq,
            });
        }
        out.sort_by(neighbor_order);
        out.into_iter().take(k).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::FlatVec;

    fn sample_boxes() -> Vec<(usize, Aabb2D)> {
        (0..40)
            .map(|i| {
                let x = f64::from(i % 8) * 10.0;
                let y = f64::from(i / 8) * 10.0;
                (i as usize, Aabb2D::from_xywh(x, y, 6.0, 0.0))
            })
            .collect()
    }

    #[test]
    fn nearest_matches_flatvec() {
        let mut flat = FlatVec::default();
        for (slot, aabb) in sample_boxes() {
            flat.insert(slot, aabb);
        }
        let tree = RTreeBackend::bulk_load(sample_boxes());

        for (x, y) in [(3.0, 4.0), (41.0, 17.0), (-20.0, -5.0), (75.0, 45.0)] {
            assert_eq!(tree.nearest(x, y, 5), flat.nearest(x, y, 5), "at ({x}, {y})");
        }
    }

    #[test]
    fn equidistant_boxes_come_back_in_slot_order() {
        let mut tree = RTreeBackend::default();
        tree.insert(7, Aabb2D::new(0.0, 2.0, 10.0, 2.0));
        tree.insert(3, Aabb2D::new(0.0, 0.0, 10.0, 0.0));

        let hits = tree.nearest(5.0, 1.0, 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slot, 3);
    }

    #[test]
    fn insert_over_a_slot_replaces_its_box() {
        let mut tree = RTreeBackend::default();
        tree.insert(0, Aabb2D::from_xywh(0.0, 0.0, 1.0, 1.0));
        tree.insert(1, Aabb2D::from_xywh(10.0, 10.0, 1.0, 1.0));
        tree.insert(0, Aabb2D::from_xywh(20.0, 20.0, 1.0, 1.0));

        let hits = tree.nearest(0.0, 0.0, 5);
        let slots: Vec<usize> = hits.iter().map(|n| n.slot).collect();
        assert_eq!(slots, [1, 0]);
    }

    #[test]
    fn bulk_load_keeps_the_last_box_per_slot() {
        let tree = RTreeBackend::bulk_load([
            (2, Aabb2D::from_xywh(0.0, 0.0, 1.0, 1.0)),
            (5, Aabb2D::from_xywh(30.0, 0.0, 1.0, 1.0)),
            (2, Aabb2D::from_xywh(60.0, 0.0, 1.0, 1.0)),
        ]);
        let hits = tree.nearest(0.0, 0.0, 5);
        let slots: Vec<usize> = hits.iter().map(|n| n.slot).collect();
        assert_eq!(slots, [5, 2]);
        assert_eq!(hits[1].distance_sq, 3600.0);
    }
}
