// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PK Linref: linear referencing on measured line layers.
//!
//! Roads are stored as polylines whose vertices carry an auxiliary M value,
//! calibrated so that M grows (or shrinks) with the kilometer points painted on
//! the road. This crate converts between map positions and those kilometer
//! points ("PK", displayed `KK+MMM`):
//!
//! - **Point → PK**: [`LayerIndex::nearest_feature`] finds the road nearest to
//!   a query point, and [`project_and_resolve_pk`] interpolates the M values of
//!   the segment under the projected point.
//! - **PK → point**: [`locate_point_by_pk`] scans a road's features for the
//!   first segment whose M range spans the target, in either direction, and
//!   interpolates the position.
//!
//! Measures are not assumed monotonic over a whole feature, only within a
//! segment. Geometry is planar; no geodesic math is involved.
//!
//! ## Minimal example
//!
//! ```rust
//! use pk_linref::{
//!     CalibratedLayer, Feature, FeatureId, LayerIndex, MeasuredGeometry, MeasurementUnit, Pk,
//!     Point, project_and_resolve_pk,
//! };
//!
//! let road = Feature::new(
//!     FeatureId(1),
//!     MeasuredGeometry::from_xym(&[(0.0, 0.0, 12_000.0), (1000.0, 0.0, 13_000.0)]),
//! )
//! .with_attribute("ID_ROAD", "N-340");
//! let layer = CalibratedLayer::new("roads", ["ID_ROAD"]).with_feature(road);
//! let index = LayerIndex::build(&layer, "ID_ROAD");
//!
//! // Point → PK.
//! let hit = index.nearest_feature(Point::new(250.0, 8.0)).unwrap().unwrap();
//! let resolved =
//!     project_and_resolve_pk(hit.feature.geometry(), Point::new(250.0, 8.0), MeasurementUnit::Meters)
//!         .unwrap();
//! assert_eq!(Pk(resolved.pk_km).to_string(), "12+250");
//!
//! // PK → point.
//! let (located, _) = index.locate("N-340", 12.5, MeasurementUnit::Meters).unwrap();
//! assert_eq!(located.point, Point::new(500.0, 0.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (on by default)
//! forwards to its dependencies; without it, enable `libm` for float math.

#![no_std]

extern crate alloc;

mod error;
mod geometry;
mod layer;
mod locate;
mod measure;
mod pk;
mod resolve;
mod search;

pub use error::{LayerInvalid, LinRefError, LocateError};
pub use geometry::{MeasuredGeometry, MeasuredSegment, MeasuredVertex, Projection};
pub use layer::{CalibratedLayer, Feature, FeatureId, GeometryKind};
pub use locate::{LocatedPoint, MEASURE_EPSILON, locate_point_by_pk};
pub use measure::{MeasurementUnit, ParseUnitError};
pub use pk::{ParsePkError, Pk, format_pk};
pub use resolve::{ResolvedPk, project_and_resolve_pk, resolve_pk};
pub use search::{CANDIDATE_FAN_OUT, LayerIndex, NearestFeature};

pub use kurbo::Point;
