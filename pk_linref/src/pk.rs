// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kilometer points and their `KK+MMM` display form.

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use serde::{Deserialize, Serialize};

/// A kilometer point: a position along a road, in kilometers.
///
/// Displays as zero-padded kilometers and meters, `KK+MMM`. Meters are rounded
/// half away from zero; a value that rounds to 1000 m rolls over into the next
/// kilometer, so `12.9995` displays as `13+000`.
///
/// ```rust
/// use pk_linref::Pk;
///
/// assert_eq!(Pk(0.0).to_string(), "00+000");
/// assert_eq!(Pk(12.345).to_string(), "12+345");
/// assert_eq!("3+050".parse::<Pk>().unwrap(), Pk::from_km_m(3.0, 50.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pk(pub f64);

impl Pk {
    /// Build a PK from a kilometer count and a meter offset.
    pub fn from_km_m(km: f64, m: f64) -> Self {
        Self(km + m / 1000.0)
    }

    /// The PK in kilometers.
    pub const fn km(self) -> f64 {
        self.0
    }

    /// Whole kilometers and rounded meters of the absolute value, with 1000 m rolled over.
    ///
    /// Rounding happens on the total meter count, with a micrometer of slack so
    /// that a half meter lost to binary representation (`12.9995` is stored as
    /// `12.99949…`) still rounds up.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the rounded meter count is non-negative and far below the u64 range"
    )]
    pub fn split(self) -> (u64, u16) {
        let total = (self.0.abs() * 1000.0 + HALF_METER_SLACK).round() as u64;
        (total / 1000, (total % 1000) as u16)
    }
}

/// Slack added to the meter count before rounding, in meters.
const HALF_METER_SLACK: f64 = 1e-6;

impl From<f64> for Pk {
    fn from(km: f64) -> Self {
        Self(km)
    }
}

impl fmt::Display for Pk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (km, m) = self.split();
        if self.0 < 0.0 && (km, m) != (0, 0) {
            f.write_str("-")?;
        }
        write!(f, "{km:02}+{m:03}")
    }
}

/// Format a PK in kilometers as `KK+MMM`.
pub fn format_pk(pk_km: f64) -> String {
    Pk(pk_km).to_string()
}

/// Error returned when a PK string is neither `KK+MMM` nor a plain number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid kilometer point {0:?}")]
pub struct ParsePkError(pub String);

impl FromStr for Pk {
    type Err = ParsePkError;

    /// Accepts `KK+MMM` (meters may have any number of digits) or a plain
    /// kilometer value such as `12.345`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePkError(s.to_owned());
        let trimmed = s.trim();
        let pk = match trimmed.split_once('+') {
            Some((km, m)) => {
                let km: f64 = km.trim().parse().map_err(|_| err())?;
                let m: u32 = m.trim().parse().map_err(|_| err())?;
                Self::from_km_m(km, f64::from(m))
            }
            None => Self(trimmed.parse().map_err(|_| err())?),
        };
        if pk.0.is_finite() { Ok(pk) } else { Err(err()) }
    }
}
