// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance between two kilometer points on the same road.
//!
//! ## Usage
//!
//! 1) The first click picks the nearest line; that line is the reference for
//!    the whole pair.
//! 2) The second click is projected onto the reference line only, never onto
//!    another road, and completes a [`DistanceMeasurement`].
//! 3) A further click drops the pair and starts a new one.
//!
//! The session logic lives in [`DistanceSession::advance`], which returns the
//! next session instead of mutating, so it can be driven and tested without a
//! tool around it.

use core::fmt;

use kurbo::Point;
use pk_linref::{CalibratedLayer, Feature, Pk, project_and_resolve_pk};
use tracing::{debug, info, warn};

use crate::active::{ActiveLayer, ToolState};
use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::marker::MarkerSlot;
use crate::transform::CoordinateTransforms;

/// One resolved click of a distance session.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceFix<'a> {
    /// Reference feature of the session.
    pub feature: &'a Feature,
    /// Road identifier of the reference feature.
    pub road: String,
    /// PK in kilometers.
    pub pk_km: f64,
    /// Arc-length along the reference feature, in layer units.
    pub arc_length: f64,
    /// Projected point, in layer coordinates.
    pub layer_point: Point,
}

/// Progress of a two-click measurement.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DistanceSession<'a> {
    /// No click yet.
    #[default]
    Idle,
    /// First point fixed.
    First(DistanceFix<'a>),
    /// Both points fixed.
    Complete(DistanceFix<'a>, DistanceFix<'a>),
}

/// What a click produced.
#[derive(Clone, Debug, PartialEq)]
pub enum DistanceUpdate {
    /// A session was started.
    FirstPoint {
        /// Road identifier.
        road: String,
        /// PK of the first point, in kilometers.
        pk_km: f64,
    },
    /// A session was completed.
    Measured(DistanceMeasurement),
}

/// Distances between two points on one road.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMeasurement {
    /// Road identifier.
    pub road: String,
    /// PK of the first point, in kilometers.
    pub pk1_km: f64,
    /// PK of the second point, in kilometers.
    pub pk2_km: f64,
    /// `|pk2 - pk1|`.
    pub pk_distance_km: f64,
    /// Distance along the line between the projected points, in kilometers.
    pub linear_distance_km: f64,
}

impl DistanceMeasurement {
    /// PK distance for the clipboard.
    pub fn clipboard_text(&self) -> String {
        format!("{:.3} km", self.pk_distance_km)
    }
}

impl fmt::Display for DistanceMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | PK1: {} · PK2: {} | PK dist: {:.3} km · Linear dist: {:.3} km",
            self.road,
            Pk(self.pk1_km),
            Pk(self.pk2_km),
            self.pk_distance_km,
            self.linear_distance_km
        )
    }
}

impl<'a> DistanceSession<'a> {
    /// Number of fixed points, 0 to 2.
    pub fn clicks(&self) -> usize {
        match self {
            Self::Idle => 0,
            Self::First(_) => 1,
            Self::Complete(..) => 2,
        }
    }

    /// Fixed points, in layer coordinates.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let (a, b) = match self {
            Self::Idle => (None, None),
            Self::First(a) => (Some(a), None),
            Self::Complete(a, b) => (Some(a), Some(b)),
        };
        a.into_iter().chain(b).map(|fix| fix.layer_point)
    }

    /// The session after a click at `layer_point`.
    ///
    /// From [`Idle`](Self::Idle) or [`Complete`](Self::Complete) the click
    /// starts a new session on the nearest line. From [`First`](Self::First)
    /// it is projected onto the reference line. `self` is not modified, so a
    /// failing click leaves the caller's session untouched.
    pub fn advance(
        &self,
        active: &ActiveLayer<'a>,
        layer_point: Point,
    ) -> Result<(Self, DistanceUpdate), ToolError> {
        match self {
            Self::Idle | Self::Complete(..) => {
                let nearest = active.nearest(layer_point)?;
                let fix = fix_on(active, nearest.feature, layer_point)?;
                let update = DistanceUpdate::FirstPoint {
                    road: fix.road.clone(),
                    pk_km: fix.pk_km,
                };
                Ok((Self::First(fix), update))
            }
            Self::First(first) => {
                let second = fix_on(active, first.feature, layer_point)?;
                let measurement = DistanceMeasurement {
                    road: first.road.clone(),
                    pk1_km: first.pk_km,
                    pk2_km: second.pk_km,
                    pk_distance_km: (second.pk_km - first.pk_km).abs(),
                    linear_distance_km: active
                        .linear_unit()
                        .to_km((second.arc_length - first.arc_length).abs()),
                };
                Ok((
                    Self::Complete(first.clone(), second),
                    DistanceUpdate::Measured(measurement),
                ))
            }
        }
    }
}

fn fix_on<'a>(
    active: &ActiveLayer<'a>,
    feature: &'a Feature,
    layer_point: Point,
) -> Result<DistanceFix<'a>, ToolError> {
    let geometry = feature.geometry();
    if geometry.is_degenerate() {
        return Err(ToolError::DegenerateGeometry);
    }
    let resolved = project_and_resolve_pk(geometry, layer_point, active.m_units())?;
    Ok(DistanceFix {
        feature,
        road: active.road_of(feature),
        pk_km: resolved.pk_km,
        arc_length: resolved.arc_length,
        layer_point: resolved.point,
    })
}

/// Two-click PK distance tool.
#[derive(Debug)]
pub struct DistanceTool<'a, T> {
    transforms: T,
    active: Option<ActiveLayer<'a>>,
    session: DistanceSession<'a>,
    last: MarkerSlot<DistanceMeasurement>,
}

impl<'a, T: CoordinateTransforms> DistanceTool<'a, T> {
    /// An inactive tool.
    pub fn new(transforms: T) -> Self {
        Self {
            transforms,
            active: None,
            session: DistanceSession::Idle,
            last: MarkerSlot::new(),
        }
    }

    /// Arm the tool on the configured layer, starting from an empty session.
    pub fn activate(
        &mut self,
        config: &ToolConfig,
        layers: &'a [CalibratedLayer],
    ) -> Result<(), ToolError> {
        self.cancel();
        self.active = None;
        let active = ActiveLayer::open(config, layers).inspect_err(|err| {
            warn!(%err, "distance tool not activated");
        })?;
        self.active = Some(active);
        Ok(())
    }

    /// Disarm the tool and drop the session.
    pub fn deactivate(&mut self) {
        self.cancel();
        if self.active.take().is_some() {
            info!("distance tool deactivated");
        }
    }

    /// Drop the session and the last measurement. Idempotent.
    pub fn cancel(&mut self) {
        self.session = DistanceSession::Idle;
        self.last.clear();
    }

    /// Whether clicks are accepted.
    pub fn state(&self) -> ToolState {
        if self.active.is_some() {
            ToolState::Armed
        } else {
            ToolState::Inactive
        }
    }

    /// Current session.
    pub fn session(&self) -> &DistanceSession<'a> {
        &self.session
    }

    /// Last completed measurement, while its pair is still on screen.
    pub fn measurement(&self) -> Option<&DistanceMeasurement> {
        self.last.current()
    }

    /// Fixed points of the session, in display coordinates.
    pub fn markers(&self) -> Result<Vec<Point>, ToolError> {
        self.session
            .points()
            .map(|p| self.transforms.layer_to_display(p).map_err(ToolError::from))
            .collect()
    }

    /// Handle a click given in display coordinates.
    pub fn click(&mut self, display_point: Point) -> Result<DistanceUpdate, ToolError> {
        let (session, update) = self.step(display_point).inspect_err(|err| {
            warn!(%err, x = display_point.x, y = display_point.y, "distance click failed");
        })?;
        match &update {
            DistanceUpdate::FirstPoint { road, pk_km } => {
                debug!(%road, pk_km, "distance session started");
                self.last.clear();
            }
            DistanceUpdate::Measured(m) => {
                debug!(road = %m.road, pk_distance_km = m.pk_distance_km, "distance measured");
                self.last.replace(m.clone());
            }
        }
        self.session = session;
        Ok(update)
    }

    fn step(&self, display_point: Point) -> Result<(DistanceSession<'a>, DistanceUpdate), ToolError> {
        let active = self.active.as_ref().ok_or(ToolError::NoLayerAssigned)?;
        let layer_point = self.transforms.display_to_layer(display_point)?;
        self.session.advance(active, layer_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::SameCrs;
    use approx::assert_relative_eq;
    use pk_linref::{FeatureId, MeasuredGeometry, MeasurementUnit};

    fn layers() -> Vec<CalibratedLayer> {
        vec![
            CalibratedLayer::new("roads", ["ID_ROAD"])
                .with_feature(
                    Feature::new(
                        FeatureId(1),
                        MeasuredGeometry::from_xym(&[(0.0, 0.0, 10_000.0), (1000.0, 0.0, 11_000.0)]),
                    )
                    .with_attribute("ID_ROAD", "A-4"),
                )
                .with_feature(
                    Feature::new(
                        FeatureId(2),
                        MeasuredGeometry::from_xym(&[(0.0, 100.0, 50_000.0), (1000.0, 100.0, 51_000.0)]),
                    )
                    .with_attribute("ID_ROAD", "N-5"),
                ),
        ]
    }

    #[test]
    fn pure_advance_does_not_touch_the_input_session() {
        let layers = layers();
        let active = ActiveLayer::open(&ToolConfig::new("roads"), &layers).unwrap();
        let idle = DistanceSession::Idle;
        let (first, update) = idle.advance(&active, Point::new(100.0, 5.0)).unwrap();
        assert_eq!(idle.clicks(), 0);
        assert_eq!(first.clicks(), 1);
        assert!(matches!(update, DistanceUpdate::FirstPoint { ref road, .. } if road == "A-4"));
    }

    #[test]
    fn second_click_sticks_to_reference_feature() {
        let layers = layers();
        let active = ActiveLayer::open(&ToolConfig::new("roads"), &layers).unwrap();
        let (first, _) = DistanceSession::Idle
            .advance(&active, Point::new(200.0, 10.0))
            .unwrap();
        // Much closer to N-5, but still measured on A-4.
        let (complete, update) = first.advance(&active, Point::new(700.0, 99.0)).unwrap();
        let DistanceUpdate::Measured(m) = update else {
            panic!("expected a measurement");
        };
        assert_eq!(m.road, "A-4");
        assert_relative_eq!(m.pk_distance_km, 0.5, epsilon = 1e-9);
        assert_relative_eq!(m.linear_distance_km, 0.5, epsilon = 1e-9);
        assert_eq!(complete.points().count(), 2);
    }

    #[test]
    fn linear_unit_scales_straight_distance() {
        let layers = layers();
        let config = ToolConfig::new("roads").with_linear_unit(MeasurementUnit::Kilometers);
        let active = ActiveLayer::open(&config, &layers).unwrap();
        let (first, _) = DistanceSession::Idle.advance(&active, Point::new(0.0, 1.0)).unwrap();
        let (_, update) = first.advance(&active, Point::new(2.0, 1.0)).unwrap();
        let DistanceUpdate::Measured(m) = update else {
            panic!("expected a measurement");
        };
        assert_relative_eq!(m.linear_distance_km, 2.0, epsilon = 1e-9);
        assert_relative_eq!(m.pk_distance_km, 0.002, epsilon = 1e-9);
    }

    #[test]
    fn summary_and_clipboard() {
        let m = DistanceMeasurement {
            road: "A-4".into(),
            pk1_km: 10.0,
            pk2_km: 10.25,
            pk_distance_km: 0.25,
            linear_distance_km: 0.2501,
        };
        assert_eq!(
            m.to_string(),
            "A-4 | PK1: 10+000 · PK2: 10+250 | PK dist: 0.250 km · Linear dist: 0.250 km"
        );
        assert_eq!(m.clipboard_text(), "0.250 km");
    }

    #[test]
    fn cancel_is_idempotent() {
        let layers = layers();
        let mut tool = DistanceTool::new(SameCrs);
        tool.activate(&ToolConfig::new("roads"), &layers).unwrap();
        tool.click(Point::new(1.0, 1.0)).unwrap();
        tool.cancel();
        tool.cancel();
        assert_eq!(tool.session().clicks(), 0);
        assert!(tool.markers().unwrap().is_empty());
        assert_eq!(tool.state(), ToolState::Armed);
    }
}
