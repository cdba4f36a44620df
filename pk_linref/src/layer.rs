// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calibrated layers: measured line features with string attributes.

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::LayerInvalid;
use crate::geometry::MeasuredGeometry;

/// Stable identifier of a feature within its layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A line feature: measured geometry plus attributes.
///
/// A missing attribute and a null attribute are the same thing here.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    id: FeatureId,
    geometry: MeasuredGeometry,
    attributes: BTreeMap<String, String>,
}

impl Feature {
    /// A feature with no attributes.
    pub fn new(id: FeatureId, geometry: MeasuredGeometry) -> Self {
        Self {
            id,
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an attribute value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Feature id.
    pub fn id(&self) -> FeatureId {
        self.id
    }

    /// Feature geometry.
    pub fn geometry(&self) -> &MeasuredGeometry {
        &self.geometry
    }

    /// Attribute value, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value, if present and not blank.
    pub fn non_empty_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).filter(|v| !v.trim().is_empty())
    }
}

/// Geometry type declared by a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Point features.
    Point,
    /// Line features.
    Line,
    /// Polygon features.
    Polygon,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Polygon => "polygon",
        })
    }
}

/// A named feature collection with a declared geometry type and field list.
///
/// The declared schema (`kind`, `has_m`, `fields`) is what validation checks,
/// mirroring how a host application describes a layer before any feature is
/// read.
#[derive(Clone, Debug, PartialEq)]
pub struct CalibratedLayer {
    name: String,
    kind: GeometryKind,
    has_m: bool,
    fields: Vec<String>,
    features: Vec<Feature>,
}

impl CalibratedLayer {
    /// An empty measured line layer with the given fields.
    pub fn new<S: Into<String>>(name: impl Into<String>, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            kind: GeometryKind::Line,
            has_m: true,
            fields: fields.into_iter().map(Into::into).collect(),
            features: Vec::new(),
        }
    }

    /// Override the declared geometry type and M flag.
    #[must_use]
    pub fn with_schema(mut self, kind: GeometryKind, has_m: bool) -> Self {
        self.kind = kind;
        self.has_m = has_m;
        self
    }

    /// Append a feature.
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.push(feature);
        self
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared geometry type.
    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Whether the declared geometry carries M.
    pub fn has_m(&self) -> bool {
        self.has_m
    }

    /// Declared field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns `true` if the layer declares `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// All features, in layer order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Feature at a layer position.
    pub fn feature(&self, position: usize) -> Option<&Feature> {
        self.features.get(position)
    }

    /// Returns `true` if the layer is a measured line layer, regardless of fields.
    pub fn is_measured_line(&self) -> bool {
        self.kind == GeometryKind::Line && self.has_m
    }

    /// Check that the layer can be used with `id_field` as road identifier.
    pub fn validate(&self, id_field: &str) -> Result<(), LayerInvalid> {
        if self.kind != GeometryKind::Line {
            return Err(LayerInvalid::NotLinear(self.kind));
        }
        if !self.has_m {
            return Err(LayerInvalid::NoMeasures);
        }
        if !self.has_field(id_field) {
            return Err(LayerInvalid::MissingField(id_field.to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_checks_kind_measures_and_field() {
        let layer = CalibratedLayer::new("roads", ["ID_ROAD"]);
        assert_eq!(layer.validate("ID_ROAD"), Ok(()));
        assert_eq!(
            layer.validate("NAME"),
            Err(LayerInvalid::MissingField("NAME".into()))
        );

        let flat = layer.clone().with_schema(GeometryKind::Line, false);
        assert_eq!(flat.validate("ID_ROAD"), Err(LayerInvalid::NoMeasures));

        let points = layer.with_schema(GeometryKind::Point, true);
        assert_eq!(
            points.validate("ID_ROAD"),
            Err(LayerInvalid::NotLinear(GeometryKind::Point))
        );
    }
}
