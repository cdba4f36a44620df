// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate reference system seam between the map display and the layer.
//!
//! Three systems are involved in every action: the display CRS clicks arrive
//! in, the layer CRS the geometry is stored in, and a geographic reference
//! CRS (latitude/longitude) used for links and exports. The tools only talk
//! to them through [`CoordinateTransforms`], so a host can plug in its own
//! projection library.

use core::fmt;

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic position in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl LatLon {
    /// A position from latitude and longitude.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// A coordinate transform that could not be applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The input or output has a NaN or infinite coordinate.
    #[error("coordinate ({x}, {y}) is not finite")]
    NonFinite {
        /// Point x.
        x: f64,
        /// Point y.
        y: f64,
    },

    /// The transform cannot be inverted.
    #[error("transform is not invertible")]
    Singular,

    /// A host transform failed.
    #[error("{0}")]
    Failed(String),
}

/// Conversions between display, layer and geographic coordinates.
pub trait CoordinateTransforms {
    /// Display CRS → layer CRS.
    fn display_to_layer(&self, point: Point) -> Result<Point, TransformError>;

    /// Layer CRS → display CRS.
    fn layer_to_display(&self, point: Point) -> Result<Point, TransformError>;

    /// Display CRS → geographic reference CRS.
    fn display_to_geographic(&self, point: Point) -> Result<LatLon, TransformError>;
}

impl<T: CoordinateTransforms + ?Sized> CoordinateTransforms for &T {
    fn display_to_layer(&self, point: Point) -> Result<Point, TransformError> {
        (**self).display_to_layer(point)
    }

    fn layer_to_display(&self, point: Point) -> Result<Point, TransformError> {
        (**self).layer_to_display(point)
    }

    fn display_to_geographic(&self, point: Point) -> Result<LatLon, TransformError> {
        (**self).display_to_geographic(point)
    }
}

fn finite(point: Point) -> Result<Point, TransformError> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(TransformError::NonFinite {
            x: point.x,
            y: point.y,
        })
    }
}

/// Display and layer share one geographic CRS: `x` is longitude, `y` latitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SameCrs;

impl CoordinateTransforms for SameCrs {
    fn display_to_layer(&self, point: Point) -> Result<Point, TransformError> {
        finite(point)
    }

    fn layer_to_display(&self, point: Point) -> Result<Point, TransformError> {
        finite(point)
    }

    fn display_to_geographic(&self, point: Point) -> Result<LatLon, TransformError> {
        let p = finite(point)?;
        Ok(LatLon::new(p.y, p.x))
    }
}

/// Affine approximations of the layer → display and display → geographic
/// transforms.
///
/// Suitable for small extents and for tests; the geographic transform maps
/// display points to `(lon, lat)` in `x`/`y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransforms {
    layer_to_display: Affine,
    display_to_layer: Affine,
    display_to_geographic: Affine,
}

impl AffineTransforms {
    /// Build from the forward transforms; fails if `layer_to_display` is singular.
    pub fn new(layer_to_display: Affine, display_to_geographic: Affine) -> Result<Self, TransformError> {
        let det = layer_to_display.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(TransformError::Singular);
        }
        Ok(Self {
            layer_to_display,
            display_to_layer: layer_to_display.inverse(),
            display_to_geographic,
        })
    }
}

impl CoordinateTransforms for AffineTransforms {
    fn display_to_layer(&self, point: Point) -> Result<Point, TransformError> {
        finite(self.display_to_layer * finite(point)?)
    }

    fn layer_to_display(&self, point: Point) -> Result<Point, TransformError> {
        finite(self.layer_to_display * finite(point)?)
    }

    fn display_to_geographic(&self, point: Point) -> Result<LatLon, TransformError> {
        let p = finite(self.display_to_geographic * finite(point)?)?;
        Ok(LatLon::new(p.y, p.x))
    }
}
