//! # Constants and type definitions for gammatra
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `gammatra` library, together with the column metadata of
//! the reconstructed event dataset.
//!
//! ## Overview
//!
//! - Electron rest energy used by the Compton scattering-angle formula
//! - Unit conversions (degrees ↔ radians)
//! - Core type aliases used across the crate
//! - Names and units of the eleven dataset columns, in output order
//!
//! These definitions are used by the event reader, the geometry utilities, and the
//! attitude construction.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Electron rest energy in keV, used in the Compton scattering-angle formula
pub const ELECTRON_REST_ENERGY: f64 = 510.9989500015;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-10;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Energy in kilo-electronvolts
pub type KiloElectronVolt = f64;
/// Distance in centimeters
pub type Centimeter = f64;
/// Time tag in Unix seconds
pub type UnixSecond = f64;

// -------------------------------------------------------------------------------------------------
// Dataset column metadata
// -------------------------------------------------------------------------------------------------

/// Names of the reconstructed dataset columns, in output order.
///
/// The pointing columns hold `[lon, lat]` pairs; the galactic chi/psi columns are
/// declared in the output contract but never populated by any parsed tag.
pub const COLUMN_NAMES: [&str; 11] = [
    "Energies",
    "TimeTags",
    "Xpointings",
    "Ypointings",
    "Zpointings",
    "Phi",
    "Chi local",
    "Psi local",
    "Distance",
    "Chi galactic",
    "Psi galactic",
];

/// Physical units of the dataset columns, aligned with [`COLUMN_NAMES`].
pub const COLUMN_UNITS: [&str; 11] = [
    "keV", "s", "rad", "rad", "rad", "rad", "rad", "rad", "cm", "rad", "rad",
];
