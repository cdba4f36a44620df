// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for linear referencing.

use alloc::string::String;

use pk_index::IndexError;
use thiserror::Error;

use crate::layer::GeometryKind;

/// Failures while projecting onto or resolving along a measured geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinRefError {
    /// The segment selected for interpolation lacks an M value at one of its ends.
    #[error("segment {segment} has no M value at one of its vertices")]
    MissingMeasure {
        /// Segment index, counted across all parts.
        segment: usize,
    },

    /// The query point has a NaN or infinite coordinate.
    #[error("point ({x}, {y}) is not finite")]
    NonFinitePoint {
        /// Point x.
        x: f64,
        /// Point y.
        y: f64,
    },

    /// The spatial index could not answer the query.
    #[error("spatial index query failed: {0}")]
    Index(#[from] IndexError),
}

/// Why a layer cannot be used for linear referencing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerInvalid {
    /// The layer does not hold line geometry.
    #[error("layer geometry is {0}, expected lines")]
    NotLinear(GeometryKind),

    /// The layer geometry carries no M ordinate.
    #[error("layer geometry has no M values")]
    NoMeasures,

    /// The configured road identifier field is absent.
    #[error("layer has no field {0:?}")]
    MissingField(String),
}

/// Why no point could be located for a road and PK.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocateError {
    /// No feature carries the requested road identifier.
    #[error("road {0:?} not found")]
    RoadNotFound(String),

    /// The road has measures, but none of its segments spans the target.
    #[error("PK out of range for this road (observed {min_km:.3}-{max_km:.3} km)")]
    OutOfRange {
        /// Smallest observed M across the road, in kilometers.
        min_km: f64,
        /// Largest observed M across the road, in kilometers.
        max_km: f64,
    },

    /// None of the road's features carries any M value.
    #[error("road {0:?} has no measured data")]
    NoMeasuredData(String),
}
