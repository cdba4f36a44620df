// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point records for saving selected history entries to a point layer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::history::History;
use crate::result::PkResult;

/// Which coordinates an export writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportCoordinates {
    /// Display CRS.
    Display,
    /// Geographic reference CRS, longitude in `x`, latitude in `y`.
    Geographic,
}

/// One exported point with its `VIA`/`PK` attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Road identifier.
    pub road_name: String,
    /// PK as `KK+MMM`.
    pub pk_display: String,
    /// Point x.
    pub x: f64,
    /// Point y.
    pub y: f64,
}

impl ExportRecord {
    /// Record for `result` in the chosen coordinates.
    pub fn from_result(result: &PkResult, coordinates: ExportCoordinates) -> Self {
        let (x, y) = match coordinates {
            ExportCoordinates::Display => (result.display_point.x, result.display_point.y),
            ExportCoordinates::Geographic => (result.geographic.lon, result.geographic.lat),
        };
        Self {
            road_name: result.road.clone(),
            pk_display: result.pk_display(),
            x,
            y,
        }
    }
}

/// Records for the entries at `selected`, indices into the newest-first listing.
///
/// Indices past the end are skipped.
pub(crate) fn export_selected(
    history: &History<PkResult>,
    selected: &[usize],
    coordinates: ExportCoordinates,
) -> Vec<ExportRecord> {
    selected
        .iter()
        .filter_map(|&i| {
            let entry = history.get(i);
            if entry.is_none() {
                debug!(index = i, len = history.len(), "skipping export of missing history entry");
            }
            entry
        })
        .map(|r| ExportRecord::from_result(r, coordinates))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::LatLon;
    use kurbo::Point;
    use pk_linref::FeatureId;

    fn entry(road: &str, pk_km: f64) -> PkResult {
        PkResult {
            road: road.into(),
            pk_km,
            feature: FeatureId(1),
            layer_point: Point::new(500.0, 600.0),
            display_point: Point::new(5.0, 6.0),
            geographic: LatLon::new(40.0, -3.0),
        }
    }

    #[test]
    fn selected_entries_in_requested_coordinates() {
        let mut history = History::unbounded();
        history.push(entry("A-1", 1.5));
        history.push(entry("N-2", 20.0));

        let records = export_selected(&history, &[1, 7, 0], ExportCoordinates::Geographic);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].road_name, "A-1");
        assert_eq!(records[0].pk_display, "01+500");
        assert_eq!((records[0].x, records[0].y), (-3.0, 40.0));
        assert_eq!(records[1].pk_display, "20+000");

        let records = export_selected(&history, &[0], ExportCoordinates::Display);
        assert_eq!((records[0].x, records[0].y), (5.0, 6.0));
    }
}
