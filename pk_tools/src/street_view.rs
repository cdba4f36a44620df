// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Street View panorama link for a geographic position.
///
/// Pure string formatting; nothing is fetched.
///
/// ```rust
/// assert_eq!(
///     pk_tools::street_view_url(40.4168, -3.7038),
///     "https://www.google.com/maps/@?api=1&map_action=pano\
///      &viewpoint=40.416800,-3.703800&heading=0&pitch=10&fov=250",
/// );
/// ```
pub fn street_view_url(lat: f64, lon: f64) -> String {
    format!(
        "https://www.google.com/maps/@?api=1&map_action=pano&viewpoint={lat:.6},{lon:.6}&heading=0&pitch=10&fov=250"
    )
}
