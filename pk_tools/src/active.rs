// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer a tool is armed on, with its cached lookups.

use kurbo::Point;
use pk_linref::{CalibratedLayer, Feature, LayerIndex, MeasurementUnit, NearestFeature};
use tracing::info;

use crate::config::ToolConfig;
use crate::error::ToolError;

/// Road name reported for features whose identifier is missing or blank.
pub const UNKNOWN_ROAD: &str = "Unknown road";

/// Whether a tool accepts input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolState {
    /// Not activated; input is rejected with [`ToolError::NoLayerAssigned`].
    #[default]
    Inactive,
    /// Activated on a valid layer.
    Armed,
}

/// A validated layer plus the settings in force for one activation.
///
/// The index is built once here and reused until the tool is activated again.
#[derive(Debug)]
pub struct ActiveLayer<'a> {
    index: LayerIndex<'a>,
    m_units: MeasurementUnit,
    linear_unit: MeasurementUnit,
}

impl<'a> ActiveLayer<'a> {
    /// Resolve the configured layer in `layers` and index it.
    pub fn open(config: &ToolConfig, layers: &'a [CalibratedLayer]) -> Result<Self, ToolError> {
        let layer = config.resolve_layer(layers)?;
        let index = LayerIndex::build(layer, config.road_field());
        info!(
            layer = layer.name(),
            id_field = config.road_field(),
            m_units = %config.m_units,
            features = layer.features().len(),
            roads = index.road_count(),
            "tool armed"
        );
        Ok(Self {
            index,
            m_units: config.m_units,
            linear_unit: config.linear_unit,
        })
    }

    /// The cached lookups.
    pub fn index(&self) -> &LayerIndex<'a> {
        &self.index
    }

    /// The layer.
    pub fn layer(&self) -> &'a CalibratedLayer {
        self.index.layer()
    }

    /// Unit of the layer's M values.
    pub fn m_units(&self) -> MeasurementUnit {
        self.m_units
    }

    /// Unit of the layer's coordinates.
    pub fn linear_unit(&self) -> MeasurementUnit {
        self.linear_unit
    }

    /// Nearest feature to a layer point; none near is an error here.
    pub(crate) fn nearest(&self, query: Point) -> Result<NearestFeature<'a>, ToolError> {
        self.index
            .nearest_feature(query)?
            .ok_or(ToolError::NoNearbyFeature)
    }

    /// Road identifier of `feature`, or [`UNKNOWN_ROAD`].
    pub fn road_of(&self, feature: &Feature) -> String {
        feature
            .non_empty_attribute(self.index.id_field())
            .unwrap_or(UNKNOWN_ROAD)
            .to_owned()
    }
}
