//! # Spacecraft attitude construction
//!
//! Builds the per-event spacecraft orientation from the two measured axis
//! directions (X and Z) and exposes the pointing outputs and the rotation into
//! the detector-local frame.
//!
//! ## Overview
//! -----------------
//! The tra stream carries the X and Z axis directions per event (`GX`/`GZ`
//! records). The Y axis is derived via `cross(Z, X)`, so that given correctly
//! normalized measured axes the triplet is orthonormal and right-handed with Z
//! as the optical axis.
//!
//! The attitude is retained on the reconstruction result for consumers that
//! need to transform arbitrary celestial directions into the detector-local
//! frame (or back); the reconstruction core itself only emits the X/Y/Z
//! pointing pairs.

use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::constants::{Degree, Radian};
use crate::geometry::{cartesian_to_polar, polar_to_cartesian};

/// Celestial reference frame in which the axis directions are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFrame {
    Galactic,
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceFrame::Galactic => write!(f, "galactic"),
        }
    }
}

/// Per-event spacecraft orientation built from the measured X and Z axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Attitude {
    frame: ReferenceFrame,
    x_axes: Vec<Vector3<f64>>,
    y_axes: Vec<Vector3<f64>>,
    z_axes: Vec<Vector3<f64>>,
}

impl Attitude {
    /// Build an attitude from per-event X and Z axis directions.
    ///
    /// Arguments
    /// ---------
    /// * `x_axes`: per-event `(lon, lat)` of the X axis, in degrees
    /// * `z_axes`: per-event `(lon, lat)` of the Z axis, in degrees
    /// * `frame`: celestial frame of the input directions
    ///
    /// Return
    /// ------
    /// * The attitude, with the Y axis derived per event via `cross(Z, X)`.
    ///
    /// Note
    /// ----
    /// * `x_axes` and `z_axes` must be equal length; this is guaranteed by the
    ///   reader for well-formed input.
    pub fn from_axes(
        x_axes: &[(Degree, Degree)],
        z_axes: &[(Degree, Degree)],
        frame: ReferenceFrame,
    ) -> Self {
        let x_axes: Vec<Vector3<f64>> = x_axes
            .iter()
            .map(|&(lon, lat)| polar_to_cartesian(lon, lat))
            .collect();
        let z_axes: Vec<Vector3<f64>> = z_axes
            .iter()
            .map(|&(lon, lat)| polar_to_cartesian(lon, lat))
            .collect();
        let y_axes: Vec<Vector3<f64>> = z_axes
            .iter()
            .zip(&x_axes)
            .map(|(z, x)| z.cross(x))
            .collect();

        Attitude {
            frame,
            x_axes,
            y_axes,
            z_axes,
        }
    }

    /// Number of per-event orientations.
    pub fn len(&self) -> usize {
        self.x_axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_axes.is_empty()
    }

    pub fn frame(&self) -> ReferenceFrame {
        self.frame
    }

    /// Pointing `(lon, lat)` of the derived Y axis for event `index`, in radians.
    pub fn y_pointing(&self, index: usize) -> (Radian, Radian) {
        let (lon, lat) = cartesian_to_polar(self.y_axes[index]);
        (lon.to_radians(), lat.to_radians())
    }

    /// Rotation from the celestial frame into the detector-local frame for
    /// event `index`.
    ///
    /// The rows of the returned matrix are the X/Y/Z axis directions, so
    /// `rot * v` expresses a celestial-frame vector `v` in local detector
    /// coordinates. For orthonormal axes the inverse transform is the
    /// transpose.
    pub fn to_local(&self, index: usize) -> Matrix3<f64> {
        Matrix3::from_rows(&[
            self.x_axes[index].transpose(),
            self.y_axes[index].transpose(),
            self.z_axes[index].transpose(),
        ])
    }
}
