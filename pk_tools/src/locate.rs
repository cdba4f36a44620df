// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Location: type a road and a PK, get the map point.

use pk_linref::{CalibratedLayer, Pk};
use tracing::{debug, info, warn};

use crate::active::{ActiveLayer, ToolState};
use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::export::{ExportCoordinates, ExportRecord, export_selected};
use crate::history::History;
use crate::marker::MarkerSlot;
use crate::result::PkResult;
use crate::transform::CoordinateTransforms;

/// PK → point tool.
///
/// Successful lookups are listed newest first and can be shown again with
/// [`recall`](Self::recall) without a new lookup.
#[derive(Debug)]
pub struct LocateTool<'a, T> {
    transforms: T,
    active: Option<ActiveLayer<'a>>,
    history: History<PkResult>,
    current: MarkerSlot<PkResult>,
}

impl<'a, T: CoordinateTransforms> LocateTool<'a, T> {
    /// A tool with no layer open.
    pub fn new(transforms: T) -> Self {
        Self {
            transforms,
            active: None,
            history: History::unbounded(),
            current: MarkerSlot::new(),
        }
    }

    /// Open the configured layer for lookups.
    pub fn open(&mut self, config: &ToolConfig, layers: &'a [CalibratedLayer]) -> Result<(), ToolError> {
        self.active = None;
        let active = ActiveLayer::open(config, layers).inspect_err(|err| {
            warn!(%err, "location tool not opened");
        })?;
        self.active = Some(active);
        Ok(())
    }

    /// Release the layer and remove the current result. History is kept.
    pub fn close(&mut self) {
        if self.active.take().is_some() {
            info!("location tool closed");
        }
        self.current.clear();
    }

    /// Whether lookups are accepted.
    pub fn state(&self) -> ToolState {
        if self.active.is_some() {
            ToolState::Armed
        } else {
            ToolState::Inactive
        }
    }

    /// Road identifiers of the open layer, for completion.
    pub fn road_names(&self) -> Vec<String> {
        self.active
            .as_ref()
            .map(|a| a.index().road_names())
            .unwrap_or_default()
    }

    /// Locate `pk_km` on `road`.
    pub fn locate(&mut self, road: &str, pk_km: f64) -> Result<PkResult, ToolError> {
        let result = self.find(road, pk_km).inspect_err(|err| {
            warn!(%err, road, pk_km, "location failed");
        })?;
        debug!(road = %result.road, pk_km, x = result.layer_point.x, y = result.layer_point.y, "located");
        self.history.push(result.clone());
        self.current.replace(result.clone());
        Ok(result)
    }

    /// Locate from the text of the input fields.
    ///
    /// `km_text` is a real number of kilometers; `m_text` an integer number
    /// of meters from 0 to 999, where blank means 0.
    pub fn locate_input(
        &mut self,
        road: &str,
        km_text: &str,
        m_text: &str,
    ) -> Result<PkResult, ToolError> {
        let pk = parse_input(km_text, m_text).inspect_err(|err| {
            warn!(%err, km_text, m_text, "rejected PK input");
        })?;
        self.locate(road, pk.km())
    }

    fn find(&self, road: &str, pk_km: f64) -> Result<PkResult, ToolError> {
        let active = self.active.as_ref().ok_or(ToolError::NoLayerAssigned)?;
        let road = road.trim();
        if road.is_empty() {
            return Err(ToolError::InvalidUserInput("road is empty".into()));
        }
        if !pk_km.is_finite() {
            return Err(ToolError::InvalidUserInput(format!("PK {pk_km} is not a number")));
        }
        let (located, feature) = active.index().locate(road, pk_km, active.m_units())?;
        let display_point = self.transforms.layer_to_display(located.point)?;
        let geographic = self.transforms.display_to_geographic(display_point)?;
        Ok(PkResult {
            road: road.to_owned(),
            pk_km,
            feature: feature.id(),
            layer_point: located.point,
            display_point,
            geographic,
        })
    }

    /// Show the history entry at `index` (newest first) again.
    pub fn recall(&mut self, index: usize) -> Option<&PkResult> {
        let entry = self.history.get(index)?.clone();
        self.current.replace(entry);
        self.current.current()
    }

    /// The result currently shown.
    pub fn current(&self) -> Option<&PkResult> {
        self.current.current()
    }

    /// Past lookups, newest first.
    pub fn history(&self) -> &History<PkResult> {
        &self.history
    }

    /// Forget every past lookup and the current one.
    pub fn clear(&mut self) {
        self.history.clear();
        self.current.clear();
    }

    /// Export records for `selected` newest-first history indices, in geographic coordinates.
    pub fn export(&self, selected: &[usize]) -> Vec<ExportRecord> {
        export_selected(&self.history, selected, ExportCoordinates::Geographic)
    }
}

/// Parse kilometer and meter field texts into a PK.
pub fn parse_input(km_text: &str, m_text: &str) -> Result<Pk, ToolError> {
    let km_text = km_text.trim();
    let km: f64 = km_text
        .parse()
        .map_err(|_| ToolError::InvalidUserInput(format!("kilometers {km_text:?} is not a number")))?;
    if !km.is_finite() || km < 0.0 {
        return Err(ToolError::InvalidUserInput(format!(
            "kilometers {km_text:?} must be a non-negative number"
        )));
    }
    let m_text = m_text.trim();
    let m: u16 = if m_text.is_empty() {
        0
    } else {
        m_text
            .parse()
            .map_err(|_| ToolError::InvalidUserInput(format!("meters {m_text:?} is not a whole number")))?
    };
    if m > 999 {
        return Err(ToolError::InvalidUserInput(format!(
            "meters {m} must be between 0 and 999"
        )));
    }
    Ok(Pk::from_km_m(km, f64::from(m)))
}
