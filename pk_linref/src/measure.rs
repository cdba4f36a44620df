// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Units of the raw M ordinate.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// How raw M values map to kilometers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementUnit {
    /// M values are meters; divide by 1000 to get kilometers.
    #[default]
    #[serde(rename = "m")]
    Meters,
    /// M values are already kilometers.
    #[serde(rename = "km")]
    Kilometers,
}

impl MeasurementUnit {
    /// Raw units per kilometer: 1000 for meters, 1 for kilometers.
    pub const fn factor(self) -> f64 {
        match self {
            Self::Meters => 1000.0,
            Self::Kilometers => 1.0,
        }
    }

    /// Convert a raw value in this unit to kilometers.
    pub fn to_km(self, raw: f64) -> f64 {
        raw / self.factor()
    }

    /// Convert kilometers to a raw value in this unit.
    pub fn from_km(self, km: f64) -> f64 {
        km * self.factor()
    }

    /// Short symbol, as stored in configuration.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
        }
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when parsing an unknown unit name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown measurement unit {0:?} (expected \"m\" or \"km\")")]
pub struct ParseUnitError(pub String);

impl FromStr for MeasurementUnit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Ok(Self::Kilometers),
            _ => Err(ParseUnitError(s.to_owned())),
        }
    }
}
