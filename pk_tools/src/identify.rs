// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identification: click a road, get its PK.

use kurbo::Point;
use pk_linref::{CalibratedLayer, project_and_resolve_pk};
use tracing::{debug, info, warn};

use crate::active::{ActiveLayer, ToolState};
use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::export::{ExportCoordinates, ExportRecord, export_selected};
use crate::history::History;
use crate::marker::MarkerSlot;
use crate::result::PkResult;
use crate::transform::CoordinateTransforms;

/// Number of identifications kept in the history.
pub const IDENTIFY_HISTORY_LIMIT: usize = 30;

/// Point → PK tool.
///
/// Each click is resolved against the nearest line of the armed layer. The
/// last [`IDENTIFY_HISTORY_LIMIT`] results are kept, and exactly one result
/// is current at a time.
#[derive(Debug)]
pub struct IdentifyTool<'a, T> {
    transforms: T,
    active: Option<ActiveLayer<'a>>,
    history: History<PkResult>,
    current: MarkerSlot<PkResult>,
}

impl<'a, T: CoordinateTransforms> IdentifyTool<'a, T> {
    /// An inactive tool.
    pub fn new(transforms: T) -> Self {
        Self {
            transforms,
            active: None,
            history: History::bounded(IDENTIFY_HISTORY_LIMIT),
            current: MarkerSlot::new(),
        }
    }

    /// Arm the tool on the configured layer.
    ///
    /// On failure the tool is left inactive.
    pub fn activate(
        &mut self,
        config: &ToolConfig,
        layers: &'a [CalibratedLayer],
    ) -> Result<(), ToolError> {
        self.active = None;
        match ActiveLayer::open(config, layers) {
            Ok(active) => {
                self.active = Some(active);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "identify tool not activated");
                Err(err)
            }
        }
    }

    /// Disarm the tool and remove the current result. History is kept.
    pub fn deactivate(&mut self) {
        if self.active.take().is_some() {
            info!("identify tool deactivated");
        }
        self.current.clear();
    }

    /// Whether clicks are accepted.
    pub fn state(&self) -> ToolState {
        if self.active.is_some() {
            ToolState::Armed
        } else {
            ToolState::Inactive
        }
    }

    /// Resolve a click given in display coordinates.
    pub fn click(&mut self, display_point: Point) -> Result<PkResult, ToolError> {
        let result = self.resolve(display_point).inspect_err(|err| {
            warn!(%err, x = display_point.x, y = display_point.y, "identify failed");
        })?;
        debug!(road = %result.road, pk_km = result.pk_km, "identified");
        self.history.push(result.clone());
        self.current.replace(result.clone());
        Ok(result)
    }

    fn resolve(&self, display_point: Point) -> Result<PkResult, ToolError> {
        let active = self.active.as_ref().ok_or(ToolError::NoLayerAssigned)?;
        let layer_point = self.transforms.display_to_layer(display_point)?;
        let nearest = active.nearest(layer_point)?;
        let geometry = nearest.feature.geometry();
        if geometry.is_degenerate() {
            return Err(ToolError::DegenerateGeometry);
        }
        let resolved = project_and_resolve_pk(geometry, layer_point, active.m_units())?;
        let display_point = self.transforms.layer_to_display(resolved.point)?;
        let geographic = self.transforms.display_to_geographic(display_point)?;
        Ok(PkResult {
            road: active.road_of(nearest.feature),
            pk_km: resolved.pk_km,
            feature: nearest.feature.id(),
            layer_point: resolved.point,
            display_point,
            geographic,
        })
    }

    /// The result currently shown.
    pub fn current(&self) -> Option<&PkResult> {
        self.current.current()
    }

    /// Past results, newest first.
    pub fn history(&self) -> &History<PkResult> {
        &self.history
    }

    /// Forget every past result and the current one.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.current.clear();
    }

    /// Export records for `selected` newest-first history indices, in display coordinates.
    pub fn export(&self, selected: &[usize]) -> Vec<ExportRecord> {
        export_selected(&self.history, selected, ExportCoordinates::Display)
    }
}
