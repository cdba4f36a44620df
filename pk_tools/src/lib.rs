// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PK Tools: interactive kilometer-point tools over calibrated road layers.
//!
//! Three tools, each a small state machine fed by a host's map events:
//!
//! - [`IdentifyTool`]: click a road, get its road identifier and PK.
//! - [`DistanceTool`]: click twice on the same road, get the PK and
//!   straight-line distances between the two points.
//! - [`LocateTool`]: enter a road and a PK, get the map point.
//!
//! Tools are armed with a [`ToolConfig`] and the host's layers. Every action
//! returns a [`Result`]; a [`ToolError`] never disarms the tool and never
//! changes its session. Coordinates cross the host boundary through
//! [`CoordinateTransforms`].
//!
//! ## Minimal example
//!
//! ```rust
//! use pk_linref::{CalibratedLayer, Feature, FeatureId, MeasuredGeometry, Point};
//! use pk_tools::{IdentifyTool, SameCrs, ToolConfig};
//!
//! let layers = vec![CalibratedLayer::new("roads", ["ID_ROAD"]).with_feature(
//!     Feature::new(
//!         FeatureId(1),
//!         MeasuredGeometry::from_xym(&[(0.0, 0.0, 12_000.0), (1000.0, 0.0, 13_000.0)]),
//!     )
//!     .with_attribute("ID_ROAD", "N-340"),
//! )];
//!
//! let mut tool = IdentifyTool::new(SameCrs);
//! tool.activate(&ToolConfig::new("roads"), &layers).unwrap();
//! let result = tool.click(Point::new(500.0, 3.0)).unwrap();
//! assert_eq!(result.to_string(), "Road: N-340 – PK 12+500 (12.500 km)");
//! ```
//!
//! This crate emits `tracing` events and never installs a subscriber.

mod active;
mod config;
mod distance;
mod error;
mod export;
mod history;
mod identify;
mod locate;
mod marker;
mod result;
mod street_view;
mod transform;

pub use active::{ActiveLayer, ToolState, UNKNOWN_ROAD};
pub use config::{DEFAULT_ID_FIELD, ToolConfig, candidate_layers, measure_preview, suggest_id_field};
pub use distance::{DistanceFix, DistanceMeasurement, DistanceSession, DistanceTool, DistanceUpdate};
pub use error::{ConfigError, ToolError};
pub use export::{ExportCoordinates, ExportRecord};
pub use history::History;
pub use identify::{IDENTIFY_HISTORY_LIMIT, IdentifyTool};
pub use locate::{LocateTool, parse_input};
pub use marker::MarkerSlot;
pub use result::PkResult;
pub use street_view::street_view_url;
pub use transform::{AffineTransforms, CoordinateTransforms, LatLon, SameCrs, TransformError};
