// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A kilometer point placed on the map, as shown to the user.

use core::fmt;

use kurbo::Point;
use pk_linref::{FeatureId, Pk};

use crate::street_view::street_view_url;
use crate::transform::LatLon;

/// A road and PK at a map position.
///
/// Produced by identification (point → PK) and by location (PK → point).
#[derive(Clone, Debug, PartialEq)]
pub struct PkResult {
    /// Road identifier, or [`UNKNOWN_ROAD`](crate::UNKNOWN_ROAD).
    pub road: String,
    /// PK in kilometers.
    pub pk_km: f64,
    /// Feature the point lies on.
    pub feature: FeatureId,
    /// Position in layer coordinates.
    pub layer_point: Point,
    /// Position in display coordinates.
    pub display_point: Point,
    /// Position in the geographic reference CRS.
    pub geographic: LatLon,
}

impl PkResult {
    /// PK as `KK+MMM`.
    pub fn pk_display(&self) -> String {
        Pk(self.pk_km).to_string()
    }

    /// Street View link at the geographic position.
    pub fn street_view_url(&self) -> String {
        street_view_url(self.geographic.lat, self.geographic.lon)
    }

    /// `lat,lon` text for the clipboard.
    pub fn coordinates_text(&self) -> String {
        self.geographic.to_string()
    }
}

impl fmt::Display for PkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Road: {} – PK {} ({:.3} km)",
            self.road,
            Pk(self.pk_km),
            self.pk_km
        )
    }
}
