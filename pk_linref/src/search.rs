// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cached lookups over one layer: spatial index and road table.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;
use pk_index::Index;
use pk_index::backends::RTreeBackend;
use smallvec::SmallVec;

use crate::MeasurementUnit;
use crate::error::{LinRefError, LocateError};
use crate::geometry::Projection;
use crate::layer::{CalibratedLayer, Feature};
use crate::locate::{LocatedPoint, locate_point_by_pk};

/// Number of index candidates refined with exact distances per query.
///
/// Box distance is only a lower bound for line geometry, so the feature whose
/// box is nearest is not necessarily the nearest line.
pub const CANDIDATE_FAN_OUT: usize = 5;

/// The feature nearest to a query point, with the projection onto it.
#[derive(Clone, Copy, Debug)]
pub struct NearestFeature<'a> {
    /// Position of the feature in its layer.
    pub position: usize,
    /// The feature.
    pub feature: &'a Feature,
    /// Nearest point on the feature.
    pub projection: Projection,
}

/// Spatial index and road table over a borrowed layer.
///
/// Build once when a tool is activated on a layer and reuse for every click
/// until the layer changes.
#[derive(Debug)]
pub struct LayerIndex<'a> {
    layer: &'a CalibratedLayer,
    id_field: String,
    spatial: Index<RTreeBackend>,
    roads: HashMap<String, SmallVec<[usize; 4]>>,
}

impl<'a> LayerIndex<'a> {
    /// Index every feature of `layer`, keying roads by `id_field`.
    ///
    /// The spatial index is bulk-loaded in one pass. Features without vertices
    /// are left out of it; features without a road value are left out of the
    /// road table.
    pub fn build(layer: &'a CalibratedLayer, id_field: &str) -> Self {
        let spatial = Index::with_backend(RTreeBackend::bulk_load(
            layer
                .features()
                .iter()
                .enumerate()
                .filter_map(|(pos, f)| f.geometry().bounding_box().map(|b| (pos, b))),
        ));
        let mut roads: HashMap<String, SmallVec<[usize; 4]>> = HashMap::new();
        for (pos, feature) in layer.features().iter().enumerate() {
            if let Some(road) = feature.attribute(id_field) {
                roads.entry(road.to_owned()).or_default().push(pos);
            }
        }
        Self {
            layer,
            id_field: id_field.to_owned(),
            spatial,
            roads,
        }
    }

    /// The indexed layer.
    pub fn layer(&self) -> &'a CalibratedLayer {
        self.layer
    }

    /// Field used as road identifier.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Number of distinct road values.
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    /// Features of `road`, in layer order.
    pub fn road_features(&self, road: &str) -> impl Iterator<Item = &'a Feature> + '_ {
        let layer = self.layer;
        self.roads
            .get(road)
            .into_iter()
            .flatten()
            .filter_map(move |&pos| layer.feature(pos))
    }

    /// Sorted, de-duplicated, non-empty road values.
    pub fn road_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .roads
            .keys()
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Nearest feature to `query`, in layer coordinates.
    ///
    /// Takes the [`CANDIDATE_FAN_OUT`] nearest boxes and keeps the candidate
    /// with the smallest exact distance; on ties the first candidate in index
    /// order (box distance, then layer position) wins. `Ok(None)` means no
    /// feature is near, which is an ordinary outcome; `Err` means the index
    /// could not be queried.
    pub fn nearest_feature(&self, query: Point) -> Result<Option<NearestFeature<'a>>, LinRefError> {
        let candidates = self.spatial.nearest(query.x, query.y, CANDIDATE_FAN_OUT)?;
        let mut best: Option<NearestFeature<'a>> = None;
        for n in &candidates {
            let Some(feature) = self.layer.feature(n.slot) else {
                continue;
            };
            let Some(projection) = feature.geometry().nearest_point(query) else {
                continue;
            };
            if best.is_none_or(|b| projection.distance < b.projection.distance) {
                best = Some(NearestFeature {
                    position: n.slot,
                    feature,
                    projection,
                });
            }
        }
        Ok(best)
    }

    /// Locate `target_pk_km` on `road` through the cached road table.
    pub fn locate(
        &self,
        road: &str,
        target_pk_km: f64,
        unit: MeasurementUnit,
    ) -> Result<(LocatedPoint, &'a Feature), LocateError> {
        let candidates: SmallVec<[&'a Feature; 4]> = self.road_features(road).collect();
        let hit = locate_point_by_pk(candidates.iter().copied(), road, target_pk_km, unit)?;
        Ok((hit, candidates[hit.candidate]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeasuredGeometry;
    use crate::layer::FeatureId;

    fn horizontal(id: u64, y: f64, road: &str) -> Feature {
        Feature::new(
            FeatureId(id),
            MeasuredGeometry::from_xym(&[(0.0, y, 0.0), (100.0, y, 100.0)]),
        )
        .with_attribute("ID_ROAD", road)
    }

    #[test]
    fn equidistant_lines_pick_the_first_feature() {
        let layer = CalibratedLayer::new("roads", ["ID_ROAD"])
            .with_feature(horizontal(10, 2.0, "B"))
            .with_feature(horizontal(11, 0.0, "A"));
        let index = LayerIndex::build(&layer, "ID_ROAD");

        for _ in 0..3 {
            let hit = index.nearest_feature(Point::new(50.0, 1.0)).unwrap().unwrap();
            assert_eq!(hit.position, 0);
            assert_eq!(hit.feature.id(), FeatureId(10));
            assert_eq!(hit.projection.distance, 1.0);
        }
    }

    #[test]
    fn exact_distance_beats_box_distance() {
        // The diagonal's box contains the query, but the horizontal line is closer.
        let diagonal = Feature::new(
            FeatureId(1),
            MeasuredGeometry::from_xym(&[(0.0, 0.0, 0.0), (100.0, 100.0, 141.0)]),
        );
        let layer = CalibratedLayer::new("roads", ["ID_ROAD"])
            .with_feature(diagonal)
            .with_feature(horizontal(2, 85.0, "N-1"));
        let index = LayerIndex::build(&layer, "ID_ROAD");

        let hit = index.nearest_feature(Point::new(10.0, 80.0)).unwrap().unwrap();
        assert_eq!(hit.feature.id(), FeatureId(2));
        assert_eq!(hit.projection.point, Point::new(10.0, 85.0));
    }

    #[test]
    fn empty_layer_finds_nothing() {
        let layer = CalibratedLayer::new("roads", ["ID_ROAD"])
            .with_feature(Feature::new(FeatureId(1), MeasuredGeometry::default()));
        let index = LayerIndex::build(&layer, "ID_ROAD");
        assert!(index.nearest_feature(Point::new(0.0, 0.0)).unwrap().is_none());
    }

    #[test]
    fn non_finite_query_surfaces_index_error() {
        let layer = CalibratedLayer::new("roads", ["ID_ROAD"]).with_feature(horizontal(1, 0.0, "A"));
        let index = LayerIndex::build(&layer, "ID_ROAD");
        assert!(matches!(
            index.nearest_feature(Point::new(f64::INFINITY, 0.0)),
            Err(LinRefError::Index(_))
        ));
    }

    #[test]
    fn bulk_loaded_index_matches_a_full_scan() {
        let mut layer = CalibratedLayer::new("roads", ["ID_ROAD"]);
        for i in 0..60_u32 {
            let x = f64::from(i % 10) * 150.0;
            let y = f64::from(i / 10) * 90.0;
            layer.push(Feature::new(
                FeatureId(u64::from(i)),
                MeasuredGeometry::from_xym(&[(x, y, 0.0), (x + 100.0, y + 40.0, 100.0)]),
            ));
        }
        let index = LayerIndex::build(&layer, "ID_ROAD");

        for query in [
            Point::new(12.0, 7.0),
            Point::new(733.0, 260.0),
            Point::new(1490.0, 505.0),
            Point::new(-300.0, 900.0),
        ] {
            let hit = index.nearest_feature(query).unwrap().unwrap();
            let scanned = layer
                .features()
                .iter()
                .filter_map(|f| f.geometry().nearest_point(query))
                .map(|p| p.distance)
                .fold(f64::INFINITY, f64::min);
            assert_eq!(hit.projection.distance, scanned, "at {query:?}");
        }
    }

    #[test]
    fn road_table_groups_features() {
        let layer = CalibratedLayer::new("roads", ["ID_ROAD"])
            .with_feature(horizontal(1, 0.0, "N-1"))
            .with_feature(horizontal(2, 10.0, "A-2"))
            .with_feature(horizontal(3, 20.0, "N-1"));
        let index = LayerIndex::build(&layer, "ID_ROAD");
        let ids: Vec<_> = index.road_features("N-1").map(Feature::id).collect();
        assert_eq!(ids, [FeatureId(1), FeatureId(3)]);
        assert_eq!(index.road_names(), ["A-2", "N-1"]);
        assert_eq!(index.road_count(), 2);
        assert_eq!(index.road_features("M-30").count(), 0);
    }
}
