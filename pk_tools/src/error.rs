// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the tools.

use pk_linref::{LayerInvalid, LinRefError, LocateError};
use thiserror::Error;

use crate::transform::TransformError;

/// Why a tool action produced no result.
///
/// Every variant is recoverable: the tool stays armed and its session is left
/// as it was before the failing action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// No layer name has been configured.
    #[error("no layer configured, choose a calibrated layer in the settings")]
    ConfigurationMissing,

    /// The configured layer is not among the available layers.
    #[error("layer {0:?} not found")]
    LayerNotFound(String),

    /// The configured layer cannot be used for kilometer points.
    #[error("invalid layer: {0}")]
    LayerInvalid(#[from] LayerInvalid),

    /// The tool received input before being activated on a layer.
    #[error("no layer assigned to the tool")]
    NoLayerAssigned,

    /// No line was found near the clicked point.
    #[error("no nearby line found")]
    NoNearbyFeature,

    /// No feature carries the requested road identifier.
    #[error("road {0:?} not found")]
    RoadNotFound(String),

    /// The PK lies outside every measured segment of the road.
    #[error("PK out of range for this road (observed {min_km:.3}-{max_km:.3} km)")]
    OutOfRange {
        /// Smallest observed PK, in kilometers.
        min_km: f64,
        /// Largest observed PK, in kilometers.
        max_km: f64,
    },

    /// The road has no M values at all.
    #[error("no measured data for road {0:?}")]
    NoMeasuredData(String),

    /// The nearest feature has fewer than two vertices.
    #[error("the nearest line has fewer than two vertices")]
    DegenerateGeometry,

    /// Text entered by the user could not be understood.
    #[error("invalid input: {0}")]
    InvalidUserInput(String),

    /// A computation failed while handling one action.
    #[error("computation failed: {0}")]
    Computation(String),
}

impl ToolError {
    /// Returns `true` for malformed user input, as opposed to lookups that
    /// were well formed but found nothing.
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::InvalidUserInput(_))
    }
}

impl From<LocateError> for ToolError {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::RoadNotFound(road) => Self::RoadNotFound(road),
            LocateError::OutOfRange { min_km, max_km } => Self::OutOfRange { min_km, max_km },
            LocateError::NoMeasuredData(road) => Self::NoMeasuredData(road),
        }
    }
}

impl From<LinRefError> for ToolError {
    fn from(err: LinRefError) -> Self {
        Self::Computation(err.to_string())
    }
}

impl From<TransformError> for ToolError {
    fn from(err: TransformError) -> Self {
        Self::Computation(err.to_string())
    }
}

/// Failure to read or write a stored [`ToolConfig`](crate::ToolConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The stored text is not a valid configuration document.
    #[error("invalid tool configuration: {0}")]
    Json(#[from] serde_json::Error),
}
