// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tool settings and the helpers behind the settings dialog.

use pk_linref::{CalibratedLayer, MeasurementUnit};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ToolError};

/// Road identifier field used when none is configured.
pub const DEFAULT_ID_FIELD: &str = "ID_ROAD";

/// Settings shared by every tool, read from an external store on activation.
///
/// Decoding is lenient: missing keys take their defaults, an empty road field
/// falls back to [`DEFAULT_ID_FIELD`] and a unit that is not a known name
/// (`null`, a number, an unknown string) decodes as meters.
///
/// ```rust
/// use pk_linref::MeasurementUnit;
/// use pk_tools::ToolConfig;
///
/// let config = ToolConfig::from_json(r#"{ "layer_name": "roads", "m_units": "km" }"#).unwrap();
/// assert_eq!(config.id_field, "ID_ROAD");
/// assert_eq!(config.m_units, MeasurementUnit::Kilometers);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Name of the calibrated layer; empty means not configured.
    pub layer_name: String,
    /// Attribute holding the road identifier.
    #[serde(deserialize_with = "id_field_or_default")]
    pub id_field: String,
    /// Unit of the M values stored in the layer.
    #[serde(deserialize_with = "unit_or_meters")]
    pub m_units: MeasurementUnit,
    /// Unit of the layer's coordinates, used for straight-line distances.
    #[serde(deserialize_with = "unit_or_meters")]
    pub linear_unit: MeasurementUnit,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            layer_name: String::new(),
            id_field: DEFAULT_ID_FIELD.to_owned(),
            m_units: MeasurementUnit::Meters,
            linear_unit: MeasurementUnit::Meters,
        }
    }
}

fn id_field_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(field)) if !field.trim().is_empty() => field,
        _ => DEFAULT_ID_FIELD.to_owned(),
    })
}

/// Any value that does not name a unit, `null` and numbers included, means meters.
fn unit_or_meters<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MeasurementUnit, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    let unit = match &raw {
        Some(Value::String(name)) => name.parse().ok(),
        _ => None,
    };
    Ok(unit.unwrap_or_else(|| {
        debug!(unit = ?raw, "unknown unit in settings, using meters");
        MeasurementUnit::Meters
    }))
}

impl ToolConfig {
    /// Settings for `layer_name` with default field and units.
    pub fn new(layer_name: impl Into<String>) -> Self {
        Self {
            layer_name: layer_name.into(),
            ..Self::default()
        }
    }

    /// Builder-style road field setter.
    #[must_use]
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Builder-style M unit setter.
    #[must_use]
    pub fn with_m_units(mut self, unit: MeasurementUnit) -> Self {
        self.m_units = unit;
        self
    }

    /// Builder-style linear unit setter.
    #[must_use]
    pub fn with_linear_unit(mut self, unit: MeasurementUnit) -> Self {
        self.linear_unit = unit;
        self
    }

    /// Decode settings from JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode settings as JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns `true` once a layer has been chosen.
    pub fn has_layer(&self) -> bool {
        !self.layer_name.trim().is_empty()
    }

    /// Road field to use, with blanks replaced by [`DEFAULT_ID_FIELD`].
    pub fn road_field(&self) -> &str {
        if self.id_field.trim().is_empty() {
            DEFAULT_ID_FIELD
        } else {
            &self.id_field
        }
    }

    /// Find the configured layer among `layers` and check that it is usable.
    pub fn resolve_layer<'a>(
        &self,
        layers: &'a [CalibratedLayer],
    ) -> Result<&'a CalibratedLayer, ToolError> {
        if !self.has_layer() {
            return Err(ToolError::ConfigurationMissing);
        }
        let layer = layers
            .iter()
            .find(|l| l.name() == self.layer_name)
            .ok_or_else(|| ToolError::LayerNotFound(self.layer_name.clone()))?;
        layer.validate(self.road_field())?;
        Ok(layer)
    }
}

/// Line layers with M values, the choices offered by the settings dialog.
pub fn candidate_layers(layers: &[CalibratedLayer]) -> impl Iterator<Item = &CalibratedLayer> {
    layers.iter().filter(|l| l.is_measured_line())
}

/// A field named like [`DEFAULT_ID_FIELD`], ignoring case.
pub fn suggest_id_field(layer: &CalibratedLayer) -> Option<&str> {
    layer
        .fields()
        .iter()
        .find(|f| f.eq_ignore_ascii_case(DEFAULT_ID_FIELD))
        .map(String::as_str)
}

/// Up to four M values from the first `max_features` features.
///
/// Shown next to the unit choice so the user can tell whether the layer
/// stores meters (values in the thousands) or kilometers.
pub fn measure_preview(layer: &CalibratedLayer, max_features: usize) -> Vec<f64> {
    layer
        .features()
        .iter()
        .take(max_features)
        .flat_map(|f| f.geometry().vertices().filter_map(|v| v.m))
        .take(4)
        .collect()
}
