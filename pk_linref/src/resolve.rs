// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point → PK: interpolate measures at an arc-length along a geometry.

use kurbo::Point;
use tracing::trace;

use crate::MeasurementUnit;
use crate::error::LinRefError;
use crate::geometry::{MeasuredGeometry, MeasuredSegment};

/// A point placed on a geometry together with its kilometer point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPk {
    /// The projected point, in layer coordinates.
    pub point: Point,
    /// PK in kilometers.
    pub pk_km: f64,
    /// Arc-length of `point` from the start of the geometry, in layer units.
    pub arc_length: f64,
}

/// Segment whose cumulative range contains `arc_length`.
///
/// The first match wins, so a shared vertex belongs to the earlier segment.
/// When nothing matches (the arc-length overshoots the last cumulative value
/// through floating-point slack, or precedes zero) the last segment is used.
fn segment_at(geometry: &MeasuredGeometry, arc_length: f64) -> Option<MeasuredSegment> {
    let mut last = None;
    for seg in geometry.segments() {
        if seg.start <= arc_length && arc_length <= seg.end() {
            return Some(seg);
        }
        last = Some(seg);
    }
    if let Some(seg) = &last {
        trace!(arc_length, segment = seg.index, "arc-length past the end, using last segment");
    }
    last
}

/// PK at an arc-length already known to lie on `geometry`.
///
/// Interpolates the two M values of the containing segment linearly by the
/// segment-local position `t`, with `t = 0` on a zero-length segment, and
/// converts to kilometers with `unit`. Geometry with fewer than two vertices
/// resolves to a zero PK rather than an error.
///
/// The first segment containing `arc_length` is used. Where two parts of a
/// multi-part geometry meet, both ends share one arc-length, so callers that
/// already know the segment should go through [`project_and_resolve_pk`].
pub fn resolve_pk(
    geometry: &MeasuredGeometry,
    arc_length: f64,
    unit: MeasurementUnit,
) -> Result<f64, LinRefError> {
    match segment_at(geometry, arc_length) {
        Some(seg) => interpolate(&seg, arc_length, unit),
        None => Ok(0.0),
    }
}

fn interpolate(
    seg: &MeasuredSegment,
    arc_length: f64,
    unit: MeasurementUnit,
) -> Result<f64, LinRefError> {
    let (m0, m1) = seg
        .measures()
        .ok_or(LinRefError::MissingMeasure { segment: seg.index })?;
    let m0 = unit.to_km(m0);
    let m1 = unit.to_km(m1);
    let t = if seg.length > 0.0 {
        (arc_length - seg.start) / seg.length
    } else {
        0.0
    };
    Ok(m0 + t * (m1 - m0))
}

/// Project `query` onto `geometry` and resolve the PK of the projection.
///
/// Measures are read from the segment the projection landed on, so a point at
/// the start of a later part takes that part's measure.
///
/// Degenerate geometry yields a zero PK at arc-length zero; the returned point
/// is then the lone vertex, or `query` itself for an empty geometry.
pub fn project_and_resolve_pk(
    geometry: &MeasuredGeometry,
    query: Point,
    unit: MeasurementUnit,
) -> Result<ResolvedPk, LinRefError> {
    if !query.is_finite() {
        return Err(LinRefError::NonFinitePoint {
            x: query.x,
            y: query.y,
        });
    }
    if geometry.is_degenerate() {
        let point = geometry.vertices().next().map_or(query, |v| v.point);
        return Ok(ResolvedPk {
            point,
            pk_km: 0.0,
            arc_length: 0.0,
        });
    }
    let Some(projection) = geometry.nearest_point(query) else {
        return Ok(ResolvedPk {
            point: query,
            pk_km: 0.0,
            arc_length: 0.0,
        });
    };
    let pk_km = match projection.segment.and_then(|i| geometry.segments().nth(i)) {
        Some(seg) => interpolate(&seg, projection.arc_length, unit)?,
        None => 0.0,
    };
    Ok(ResolvedPk {
        point: projection.point,
        pk_km,
        arc_length: projection.arc_length,
    })
}
