//! # Spherical and Cartesian geometry utilities
//!
//! Stateless conversions between spherical (longitude/latitude) and Cartesian
//! unit-vector representations, plus the cross-product construction of the third
//! spacecraft axis from the two measured ones.
//!
//! ## Units & Conventions
//! -----------------
//! - [`polar_to_cartesian`], [`cartesian_to_polar`] and [`construct_third_axis`]
//!   work in **degrees**, matching the unit path of the reconstruction pipeline
//!   (wrapped radian longitudes are converted to degrees before the Y axis is
//!   built, and back to radians afterwards).
//! - [`cartesian_to_spherical`] returns **radians**, with longitude in `[0, 2π)`
//!   and latitude measured from the equator.
//! - [`wrap_longitude`] remaps a `[0, 2π)` longitude into the conventional
//!   `(−π, π]` range.

use nalgebra::Vector3;

use crate::constants::{Degree, Radian, DPI};

/// Convert a spherical direction to a Cartesian unit vector.
///
/// Arguments
/// ---------
/// * `lon`: longitude in degrees
/// * `lat`: latitude in degrees
///
/// Return
/// ------
/// * The unit vector `(cos lon · cos lat, sin lon · cos lat, sin lat)`.
pub fn polar_to_cartesian(lon: Degree, lat: Degree) -> Vector3<f64> {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    Vector3::new(
        lon.cos() * lat.cos(),
        lon.sin() * lat.cos(),
        lat.sin(),
    )
}

/// Convert a Cartesian unit vector to a spherical direction.
///
/// Arguments
/// ---------
/// * `vector`: a unit vector; the latitude is undefined for non-unit input
///
/// Return
/// ------
/// * `(lon, lat)` in degrees, with `lon ∈ (−180, 180]` from `atan2` and
///   `lat ∈ [−90, 90]` from `asin`.
pub fn cartesian_to_polar(vector: Vector3<f64>) -> (Degree, Degree) {
    let lon = vector.y.atan2(vector.x);
    let lat = vector.z.asin();
    (lon.to_degrees(), lat.to_degrees())
}

/// Construct the Y spacecraft axis from the measured X and Z axes.
///
/// The cross product is taken in the order `cross(Z, X)`, which fixes the
/// handedness (and thus the sign) of the derived Y axis.
///
/// Arguments
/// ---------
/// * `x_lon`, `x_lat`: longitude/latitude of the X axis in degrees
/// * `z_lon`, `z_lat`: longitude/latitude of the Z axis (optical axis) in degrees
///
/// Return
/// ------
/// * `(lon, lat)` of the Y axis in degrees.
///
/// Note
/// ----
/// * An X axis parallel or antiparallel to Z is a precondition violation: the
///   cross product degenerates to a zero-length vector and the result is
///   ill-defined. Callers must provide orthogonal measured axes.
pub fn construct_third_axis(
    x_lon: Degree,
    x_lat: Degree,
    z_lon: Degree,
    z_lat: Degree,
) -> (Degree, Degree) {
    let x = polar_to_cartesian(x_lon, x_lat);
    let z = polar_to_cartesian(z_lon, z_lat);
    cartesian_to_polar(z.cross(&x))
}

/// Convert a 3D Cartesian vector to spherical coordinates.
///
/// Arguments
/// ---------
/// * `vector`: position vector, any length unit
///
/// Return
/// ------
/// * `(ρ, lat, lon)`:
///     - `ρ`: Euclidean norm of the vector (same unit as the input).
///     - `lat`: elevation from the equatorial plane in radians, `[−π/2, π/2]`.
///     - `lon`: azimuth in radians, `[0, 2π)`.
///
/// Remarks
/// -------
/// * A zero-length input yields `(0.0, 0.0, 0.0)`.
/// * The azimuth uses `atan2` to preserve quadrant information.
pub fn cartesian_to_spherical(vector: Vector3<f64>) -> (f64, Radian, Radian) {
    let norm = vector.norm();
    if norm == 0. {
        return (0.0, 0.0, 0.0);
    }

    let lat = (vector.z / norm).asin();
    let lon = vector.y.atan2(vector.x);
    let lon = if lon < 0.0 { lon + DPI } else { lon };
    (norm, lat, lon)
}

/// Remap a longitude parsed in `[0, 2π)` to the conventional `(−π, π]` range.
///
/// Values strictly greater than π are shifted by −2π; all others pass through.
pub fn wrap_longitude(lon: Radian) -> Radian {
    if lon > std::f64::consts::PI {
        lon - DPI
    } else {
        lon
    }
}
