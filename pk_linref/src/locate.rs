// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PK → point: find the segment whose M range spans a target and interpolate.
//!
//! Matching is by discovery order: the first feature whose measures span the
//! target wins, and within it the first segment. Multi-part roads whose
//! measure ranges overlap therefore resolve to whichever part comes first; no
//! attempt is made to pick a globally best match.

use alloc::borrow::ToOwned;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use tracing::debug;

use crate::MeasurementUnit;
use crate::error::LocateError;
use crate::geometry::MeasuredGeometry;
use crate::layer::Feature;

/// Slack applied to measure comparisons, in raw M units.
pub const MEASURE_EPSILON: f64 = 1e-6;

/// A point found for a target measure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocatedPoint {
    /// The interpolated point, in layer coordinates.
    pub point: Point,
    /// Position of the owning feature among the candidates, in iteration order.
    pub candidate: usize,
    /// Segment index within the owning feature.
    pub segment: usize,
}

impl MeasuredGeometry {
    /// First point whose interpolated measure equals `target_m` (raw M units).
    ///
    /// A segment matches when `target_m` lies in `[min(m0, m1) - ε, max(m0, m1) + ε]`,
    /// so measures may run in either direction along the vertices. Segments
    /// missing a measure are skipped. A segment whose two measures are equal
    /// (within ε) yields its first vertex.
    pub fn point_at_measure(&self, target_m: f64) -> Option<(Point, usize)> {
        self.segments().find_map(|seg| {
            let (m0, m1) = seg.measures()?;
            let lo = m0.min(m1) - MEASURE_EPSILON;
            let hi = m0.max(m1) + MEASURE_EPSILON;
            if !(lo..=hi).contains(&target_m) {
                return None;
            }
            if (m1 - m0).abs() < MEASURE_EPSILON {
                return Some((seg.line.p0, seg.index));
            }
            let t = (target_m - m0) / (m1 - m0);
            Some((seg.line.p0.lerp(seg.line.p1, t), seg.index))
        })
    }
}

/// Locate the map point of `target_pk_km` among the features of one road.
///
/// `candidates` are all features sharing the road identifier `road`, in the
/// order they should be tried. The target is converted to raw M with `unit`;
/// a feature whose overall M range (±ε) excludes it is skipped without
/// scanning its segments, but its range still counts towards the observed
/// range reported by [`LocateError::OutOfRange`].
pub fn locate_point_by_pk<'a, I>(
    candidates: I,
    road: &str,
    target_pk_km: f64,
    unit: MeasurementUnit,
) -> Result<LocatedPoint, LocateError>
where
    I: IntoIterator<Item = &'a Feature>,
{
    let target_m = unit.from_km(target_pk_km);
    let mut seen = false;
    let mut observed: Option<(f64, f64)> = None;

    for (candidate, feature) in candidates.into_iter().enumerate() {
        seen = true;
        let geometry = feature.geometry();
        let Some((fmin, fmax)) = geometry.measure_range() else {
            continue;
        };
        observed = Some(match observed {
            None => (fmin, fmax),
            Some((lo, hi)) => (lo.min(fmin), hi.max(fmax)),
        });
        if target_m < fmin - MEASURE_EPSILON || target_m > fmax + MEASURE_EPSILON {
            continue;
        }
        if let Some((point, segment)) = geometry.point_at_measure(target_m) {
            return Ok(LocatedPoint {
                point,
                candidate,
                segment,
            });
        }
    }

    if !seen {
        return Err(LocateError::RoadNotFound(road.to_owned()));
    }
    match observed {
        Some((lo, hi)) => {
            let (min_km, max_km) = (unit.to_km(lo), unit.to_km(hi));
            debug!(road, target_pk_km, min_km, max_km, "PK outside the road's measures");
            Err(LocateError::OutOfRange { min_km, max_km })
        }
        None => Err(LocateError::NoMeasuredData(road.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeasuredVertex;
    use crate::layer::FeatureId;
    use alloc::vec;
    use approx::assert_relative_eq;

    fn feature(id: u64, coords: &[(f64, f64, f64)]) -> Feature {
        Feature::new(FeatureId(id), MeasuredGeometry::from_xym(coords)).with_attribute("ID_ROAD", "N-1")
    }

    #[test]
    fn finds_midpoint_of_single_segment() {
        let f = feature(1, &[(0.0, 0.0, 0.0), (100.0, 200.0, 1000.0)]);
        let hit = locate_point_by_pk([&f], "N-1", 0.5, MeasurementUnit::Meters).unwrap();
        assert_relative_eq!(hit.point.x, 50.0);
        assert_relative_eq!(hit.point.y, 100.0);
        assert_eq!(hit.segment, 0);
    }

    #[test]
    fn descending_segment_is_matched() {
        let f = feature(1, &[(0.0, 0.0, 1000.0), (100.0, 0.0, 0.0)]);
        let hit = locate_point_by_pk([&f], "N-1", 0.4, MeasurementUnit::Meters).unwrap();
        assert_relative_eq!(hit.point.x, 60.0, epsilon = 1e-9);
        assert_relative_eq!(hit.point.y, 0.0);
    }

    #[test]
    fn first_feature_wins_on_overlap() {
        let a = feature(1, &[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0)]);
        let b = feature(2, &[(0.0, 50.0, 5.0), (10.0, 50.0, 15.0)]);
        let hit = locate_point_by_pk([&a, &b], "N-1", 7.0, MeasurementUnit::Kilometers).unwrap();
        assert_eq!(hit.candidate, 0);
        let hit = locate_point_by_pk([&b, &a], "N-1", 7.0, MeasurementUnit::Kilometers).unwrap();
        assert_eq!(hit.candidate, 0);
        assert_relative_eq!(hit.point.y, 50.0);
    }

    #[test]
    fn later_part_is_used_when_first_excludes_target() {
        let a = feature(1, &[(0.0, 0.0, 0.0), (10.0, 0.0, 1000.0)]);
        let b = feature(2, &[(10.0, 0.0, 1000.0), (10.0, 30.0, 4000.0)]);
        let hit = locate_point_by_pk([&a, &b], "N-1", 2.5, MeasurementUnit::Meters).unwrap();
        assert_eq!(hit.candidate, 1);
        assert_relative_eq!(hit.point.y, 15.0);
    }

    #[test]
    fn out_of_range_reports_observed_bounds() {
        let a = feature(1, &[(0.0, 0.0, 2000.0), (10.0, 0.0, 3000.0)]);
        let b = feature(2, &[(10.0, 0.0, 3000.0), (20.0, 0.0, 5500.0)]);
        let err = locate_point_by_pk([&a, &b], "N-1", 9.0, MeasurementUnit::Meters).unwrap_err();
        assert_eq!(
            err,
            LocateError::OutOfRange {
                min_km: 2.0,
                max_km: 5.5
            }
        );
        let err = locate_point_by_pk([&a], "N-1", 1.999, MeasurementUnit::Meters).unwrap_err();
        assert!(matches!(err, LocateError::OutOfRange { .. }));
    }

    #[test]
    fn gap_between_segments_is_out_of_range() {
        // A multi-part feature whose parts leave a hole in the measures.
        let f = Feature::new(
            FeatureId(9),
            MeasuredGeometry::multi([
                vec![MeasuredVertex::new(0.0, 0.0, 0.0), MeasuredVertex::new(1.0, 0.0, 1.0)],
                vec![MeasuredVertex::new(5.0, 0.0, 3.0), MeasuredVertex::new(6.0, 0.0, 4.0)],
            ]),
        );
        let err = locate_point_by_pk([&f], "X", 2.0, MeasurementUnit::Kilometers).unwrap_err();
        assert_eq!(
            err,
            LocateError::OutOfRange {
                min_km: 0.0,
                max_km: 4.0
            }
        );
        let hit = locate_point_by_pk([&f], "X", 3.5, MeasurementUnit::Kilometers).unwrap();
        assert_eq!(hit.segment, 1);
        assert_relative_eq!(hit.point.x, 5.5);
    }

    #[test]
    fn no_measures_and_no_features() {
        let f = Feature::new(
            FeatureId(1),
            MeasuredGeometry::line([
                MeasuredVertex::unmeasured(0.0, 0.0),
                MeasuredVertex::unmeasured(1.0, 0.0),
            ]),
        );
        assert_eq!(
            locate_point_by_pk([&f], "A-7", 1.0, MeasurementUnit::Meters),
            Err(LocateError::NoMeasuredData("A-7".into()))
        );
        assert_eq!(
            locate_point_by_pk(core::iter::empty(), "A-7", 1.0, MeasurementUnit::Meters),
            Err(LocateError::RoadNotFound("A-7".into()))
        );
    }

    #[test]
    fn flat_segment_returns_its_start() {
        let g = MeasuredGeometry::from_xym(&[(3.0, 4.0, 10.0), (9.0, 4.0, 10.0)]);
        assert_eq!(g.point_at_measure(10.0), Some((Point::new(3.0, 4.0), 0)));
    }

    #[test]
    fn epsilon_tolerates_boundary_slack() {
        let g = MeasuredGeometry::from_xym(&[(0.0, 0.0, 0.0), (10.0, 0.0, 10.0)]);
        assert!(g.point_at_measure(10.000_000_5).is_some());
        assert!(g.point_at_measure(10.01).is_none());
    }
}
