// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measured polylines: vertices with an optional M ordinate, grouped in parts.
//!
//! Arc-length runs across parts in order, but segments never bridge two parts:
//! the end of one part and the start of the next are not joined.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, ParamCurve, ParamCurveNearest, Point};
use pk_index::Aabb2D;

/// Accuracy handed to kurbo's nearest-point queries; exact for straight lines.
const NEAREST_ACCURACY: f64 = 1e-9;

/// A polyline vertex with an optional measure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasuredVertex {
    /// Position in layer coordinates.
    pub point: Point,
    /// Raw M value, in the layer's measurement unit.
    pub m: Option<f64>,
}

impl MeasuredVertex {
    /// A vertex carrying a measure.
    pub fn new(x: f64, y: f64, m: f64) -> Self {
        Self {
            point: Point::new(x, y),
            m: Some(m),
        }
    }

    /// A vertex without a measure.
    pub fn unmeasured(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            m: None,
        }
    }
}

/// One segment of a measured geometry, with its place along the whole line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasuredSegment {
    /// Segment index, counted across all parts.
    pub index: usize,
    /// The segment's straight line.
    pub line: Line,
    /// Measure at `line.p0`.
    pub m0: Option<f64>,
    /// Measure at `line.p1`.
    pub m1: Option<f64>,
    /// Cumulative arc-length at `line.p0`.
    pub start: f64,
    /// Euclidean length of the segment.
    pub length: f64,
}

impl MeasuredSegment {
    /// Cumulative arc-length at `line.p1`.
    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    /// Both measures, if the segment has them.
    pub fn measures(&self) -> Option<(f64, f64)> {
        Some((self.m0?, self.m1?))
    }
}

/// The nearest point of a geometry to some query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// The nearest point on the geometry.
    pub point: Point,
    /// Arc-length of `point` from the start of the geometry.
    pub arc_length: f64,
    /// Euclidean distance between the query and `point`.
    pub distance: f64,
    /// Segment holding `point`, or `None` for a single-vertex geometry.
    pub segment: Option<usize>,
}

/// A line geometry with measures, made of one or more parts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasuredGeometry {
    parts: Vec<Vec<MeasuredVertex>>,
}

impl MeasuredGeometry {
    /// A single-part line.
    pub fn line(vertices: impl IntoIterator<Item = MeasuredVertex>) -> Self {
        Self {
            parts: vec![vertices.into_iter().collect()],
        }
    }

    /// A multi-part line; empty parts are dropped.
    pub fn multi<P>(parts: impl IntoIterator<Item = P>) -> Self
    where
        P: IntoIterator<Item = MeasuredVertex>,
    {
        Self {
            parts: parts
                .into_iter()
                .map(|p| p.into_iter().collect::<Vec<_>>())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// A single-part line from `(x, y, m)` triples.
    pub fn from_xym(coords: &[(f64, f64, f64)]) -> Self {
        Self::line(coords.iter().map(|&(x, y, m)| MeasuredVertex::new(x, y, m)))
    }

    /// The parts of this geometry.
    pub fn parts(&self) -> &[Vec<MeasuredVertex>] {
        &self.parts
    }

    /// All vertices, part after part.
    pub fn vertices(&self) -> impl Iterator<Item = &MeasuredVertex> + '_ {
        self.parts.iter().flatten()
    }

    /// Total number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    /// Returns `true` if the geometry has fewer than two vertices.
    pub fn is_degenerate(&self) -> bool {
        self.vertex_count() < 2
    }

    /// Segments in order, each carrying its cumulative start offset.
    pub fn segments(&self) -> impl Iterator<Item = MeasuredSegment> + '_ {
        let mut start = 0.0;
        self.parts
            .iter()
            .flat_map(|part| part.windows(2))
            .enumerate()
            .map(move |(index, pair)| {
                let line = Line::new(pair[0].point, pair[1].point);
                let length = line.length();
                let seg = MeasuredSegment {
                    index,
                    line,
                    m0: pair[0].m,
                    m1: pair[1].m,
                    start,
                    length,
                };
                start += length;
                seg
            })
    }

    /// Total arc-length.
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length).sum()
    }

    /// Smallest and largest M value over all vertices.
    pub fn measure_range(&self) -> Option<(f64, f64)> {
        self.vertices()
            .filter_map(|v| v.m)
            .fold(None, |acc, m| match acc {
                None => Some((m, m)),
                Some((lo, hi)) => Some((lo.min(m), hi.max(m))),
            })
    }

    /// Returns `true` if at least one vertex carries an M value.
    pub fn has_measures(&self) -> bool {
        self.vertices().any(|v| v.m.is_some())
    }

    /// Bounding box of all vertices.
    pub fn bounding_box(&self) -> Option<Aabb2D> {
        Aabb2D::from_points(self.vertices().map(|v| (v.point.x, v.point.y)))
    }

    /// Nearest point of the geometry to `query`.
    ///
    /// Ties between segments go to the first segment in vertex order. A
    /// single-vertex geometry projects onto that vertex; an empty one has no
    /// projection.
    pub fn nearest_point(&self, query: Point) -> Option<Projection> {
        let mut best: Option<Projection> = None;
        for seg in self.segments() {
            let near = seg.line.nearest(query, NEAREST_ACCURACY);
            let distance = near.distance_sq.sqrt();
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(Projection {
                    point: seg.line.eval(near.t),
                    arc_length: seg.start + near.t * seg.length,
                    distance,
                    segment: Some(seg.index),
                });
            }
        }
        best.or_else(|| {
            self.vertices().next().map(|v| Projection {
                point: v.point,
                arc_length: 0.0,
                distance: v.point.distance(query),
                segment: None,
            })
        })
    }
}
