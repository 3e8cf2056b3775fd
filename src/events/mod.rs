//! # Event reconstruction pipeline
//!
//! High-level utilities to turn a **tra** event stream into a reconstructed,
//! calibrated observation set.
//!
//! ## Overview
//! -----------------
//! - [`tra_reader`] parses the record stream into raw per-event sequences.
//! - This module derives the physical observables from those sequences:
//!   longitude wrapping, spacecraft Y-axis construction, interaction-delta
//!   spherical conversion, and the COMPTEL-convention angle rotations.
//! - [`dataset_writer`] serializes the resulting dataset as a compressed
//!   columnar table.
//!
//! ## Data model
//! -----------------
//! - [`EventDataset`] is an explicit record of the eleven observable sequences
//!   (no string-keyed lookup), one element per detected event in well-formed
//!   input.
//! - [`ReconstructedEvents`] couples the dataset with the per-event spacecraft
//!   [`Attitude`](crate::attitude::Attitude), retained for consumers that need
//!   to transform celestial directions into the detector-local frame.
//!
//! ## Units & Conventions
//! -----------------
//! - All output angles are **radians**; pointings are `[lon, lat]` pairs with
//!   longitudes wrapped into `(−π, π]`.
//! - `psi_local` is a colatitude measured from the negative detector Z axis
//!   (the detector faces −Z in its local frame); `chi_local` is referred to the
//!   negative X axis. Both rotations match the historical COMPTEL definition.
//! - `chi_galactic`/`psi_galactic` are declared in the output contract but not
//!   populated by any parsed tag; they are emitted as empty sequences.
pub mod dataset_writer;
pub mod tra_reader;

use std::f64::consts::{FRAC_PI_2, PI};

use camino::Utf8Path;
use itertools::izip;
use nalgebra::Vector3;

use crate::attitude::{Attitude, ReferenceFrame};
use crate::constants::{Centimeter, KiloElectronVolt, Radian, UnixSecond};
use crate::events::tra_reader::{extract_tra, RawEventData};
use crate::gammatra_errors::GammatraError;
use crate::geometry::{cartesian_to_spherical, construct_third_axis, wrap_longitude};

/// The reconstructed observation set: eleven parallel observable sequences.
///
/// One element per detected event for the populated sequences (counts may
/// differ only for malformed input, which the reader rejects). The set is
/// immutable once returned and owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDataset {
    /// Total photon energy \[keV\]
    pub energies: Vec<KiloElectronVolt>,
    /// Time tag \[Unix s\], non-decreasing in well-formed input
    pub time_tags: Vec<UnixSecond>,
    /// Detector X-axis pointing `[lon, lat]` \[rad\], galactic frame
    pub x_pointings: Vec<[Radian; 2]>,
    /// Detector Y-axis pointing `[lon, lat]` \[rad\], derived via cross product
    pub y_pointings: Vec<[Radian; 2]>,
    /// Detector Z-axis pointing `[lon, lat]` \[rad\], galactic frame
    pub z_pointings: Vec<[Radian; 2]>,
    /// Compton scattering angle \[rad\], NaN for out-of-domain events
    pub phi: Vec<Radian>,
    /// Local-frame azimuthal angle \[rad\], COMPTEL convention
    pub chi_local: Vec<Radian>,
    /// Local-frame polar angle \[rad\], COMPTEL convention
    pub psi_local: Vec<Radian>,
    /// Distance between the first two interactions \[cm\]
    pub distance: Vec<Centimeter>,
    /// Galactic-frame chi \[rad\] — never populated by any parsed tag
    pub chi_galactic: Vec<Radian>,
    /// Galactic-frame psi \[rad\] — never populated by any parsed tag
    pub psi_galactic: Vec<Radian>,
}

impl EventDataset {
    /// Number of reconstructed events, taken from the energy sequence.
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }
}

/// A reconstructed observation set together with the spacecraft attitude.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedEvents {
    /// The eleven observable sequences handed to the output layer
    pub dataset: EventDataset,
    /// Per-event spacecraft orientation in the galactic frame
    pub attitude: Attitude,
}

impl ReconstructedEvents {
    /// Read a `.tra` (or `.tra.gz`) event file and reconstruct its observables.
    ///
    /// Runs the full single-pass pipeline: stream parsing, longitude wrapping,
    /// Y-axis construction, spherical conversion of the interaction deltas, and
    /// the COMPTEL-convention angle rotations.
    ///
    /// Arguments
    /// ---------
    /// * `trafile`: path to the event file; the extension selects the
    ///   decompression path (see [`tra_reader`]).
    ///
    /// Return
    /// ------
    /// * The reconstructed events, or a [`GammatraError`] on configuration,
    ///   I/O, or parse failure.
    pub fn from_tra(trafile: &Utf8Path) -> Result<Self, GammatraError> {
        let raw = extract_tra(trafile)?;
        Ok(Self::from_raw(raw))
    }

    /// Derive the physical observables from the raw parsed sequences.
    pub(crate) fn from_raw(raw: RawEventData) -> Self {
        // Change longitudes from [0, 2π) to the conventional (−π, π] range.
        let lon_x: Vec<Radian> = raw.lon_x.iter().map(|&lon| wrap_longitude(lon)).collect();
        let lon_z: Vec<Radian> = raw.lon_z.iter().map(|&lon| wrap_longitude(lon)).collect();

        // Construct the Y direction from the X and Z directions, per event.
        // The third-axis construction runs in degrees, reproducing the unit
        // path of the reference implementation exactly.
        let y_pointings: Vec<[Radian; 2]> = izip!(&lon_x, &raw.lat_x, &lon_z, &raw.lat_z)
            .map(|(&x_lon, &x_lat, &z_lon, &z_lat)| {
                let (y_lon, y_lat) = construct_third_axis(
                    x_lon.to_degrees(),
                    x_lat.to_degrees(),
                    z_lon.to_degrees(),
                    z_lat.to_degrees(),
                );
                [y_lon.to_radians(), y_lat.to_radians()]
            })
            .collect();

        // Convert the interaction-delta vectors to spherical polar observables
        // and apply the COMPTEL-convention rotations:
        // - psi becomes a colatitude measured from the negative Z direction
        //   (the detector sits at z < 0 in the local frame),
        // - chi is redefined relative to the negative X axis.
        let mut distance: Vec<Centimeter> = Vec::with_capacity(raw.delta_x.len());
        let mut psi_local: Vec<Radian> = Vec::with_capacity(raw.delta_x.len());
        let mut chi_local: Vec<Radian> = Vec::with_capacity(raw.delta_x.len());
        for (&dx, &dy, &dz) in izip!(&raw.delta_x, &raw.delta_y, &raw.delta_z) {
            let (dist, psi, chi) = cartesian_to_spherical(Vector3::new(dx, dy, dz));
            distance.push(dist);
            psi_local.push(psi + FRAC_PI_2);
            chi_local.push(if chi < PI { chi + PI } else { chi - PI });
        }

        let x_axes: Vec<(f64, f64)> = izip!(&lon_x, &raw.lat_x)
            .map(|(&lon, &lat)| (lon.to_degrees(), lat.to_degrees()))
            .collect();
        let z_axes: Vec<(f64, f64)> = izip!(&lon_z, &raw.lat_z)
            .map(|(&lon, &lat)| (lon.to_degrees(), lat.to_degrees()))
            .collect();
        let attitude = Attitude::from_axes(&x_axes, &z_axes, ReferenceFrame::Galactic);

        let x_pointings: Vec<[Radian; 2]> = izip!(&lon_x, &raw.lat_x)
            .map(|(&lon, &lat)| [lon, lat])
            .collect();
        let z_pointings: Vec<[Radian; 2]> = izip!(&lon_z, &raw.lat_z)
            .map(|(&lon, &lat)| [lon, lat])
            .collect();

        let dataset = EventDataset {
            energies: raw.energies,
            time_tags: raw.time_tags,
            x_pointings,
            y_pointings,
            z_pointings,
            phi: raw.phi,
            chi_local,
            psi_local,
            distance,
            // Declared in the output contract, but no parser tag populates
            // them; emitted empty rather than derived.
            chi_galactic: Vec::new(),
            psi_galactic: Vec::new(),
        };

        ReconstructedEvents { dataset, attitude }
    }
}

#[cfg(test)]
mod events_test {
    use super::*;
    use approx::assert_relative_eq;

    fn raw_single_event() -> RawEventData {
        RawEventData {
            energies: vec![500.0],
            phi: vec![1.2464723630783294],
            time_tags: vec![1835478000.0],
            event_types: vec!["CO".to_string()],
            lon_x: vec![350.0_f64.to_radians()],
            lat_x: vec![0.0],
            lon_z: vec![80.0_f64.to_radians()],
            lat_z: vec![0.0],
            delta_x: vec![0.0],
            delta_y: vec![1.0],
            delta_z: vec![0.0],
        }
    }

    #[test]
    fn test_longitude_wrap_applied() {
        let events = ReconstructedEvents::from_raw(raw_single_event());
        assert_relative_eq!(
            events.dataset.x_pointings[0][0],
            (-10.0_f64).to_radians(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            events.dataset.z_pointings[0][0],
            80.0_f64.to_radians(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_y_axis_orthogonal_to_x_and_z() {
        use crate::geometry::polar_to_cartesian;

        let events = ReconstructedEvents::from_raw(raw_single_event());
        let [y_lon, y_lat] = events.dataset.y_pointings[0];
        let y = polar_to_cartesian(y_lon.to_degrees(), y_lat.to_degrees());
        let x = polar_to_cartesian(-10.0, 0.0);
        let z = polar_to_cartesian(80.0, 0.0);

        assert!(y.dot(&x).abs() < 1e-10);
        assert!(y.dot(&z).abs() < 1e-10);
    }

    #[test]
    fn test_delta_spherical_and_convention_rotations() {
        let events = ReconstructedEvents::from_raw(raw_single_event());
        let dataset = &events.dataset;

        // Delta (0, 1, 0): distance 1 cm, elevation 0, azimuth π/2
        assert_relative_eq!(dataset.distance[0], 1.0, epsilon = 1e-12);
        // psi: 0 + π/2
        assert_relative_eq!(dataset.psi_local[0], FRAC_PI_2, epsilon = 1e-12);
        // chi: π/2 < π, rotated by +π
        assert_relative_eq!(dataset.chi_local[0], 3.0 * FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_chi_rotation_branches() {
        let mut raw = raw_single_event();
        // Azimuth of (-1, -1, 0) is 5π/4 ≥ π, exercising the subtract branch
        raw.delta_x = vec![-1.0];
        raw.delta_y = vec![-1.0];
        raw.delta_z = vec![0.0];

        let events = ReconstructedEvents::from_raw(raw);
        assert_relative_eq!(
            events.dataset.chi_local[0],
            5.0 * std::f64::consts::FRAC_PI_4 - PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_galactic_sequences_empty() {
        let events = ReconstructedEvents::from_raw(raw_single_event());
        assert!(events.dataset.chi_galactic.is_empty());
        assert!(events.dataset.psi_galactic.is_empty());
    }

    #[test]
    fn test_parallel_sequences_aligned() {
        let events = ReconstructedEvents::from_raw(raw_single_event());
        let dataset = &events.dataset;
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.time_tags.len(), 1);
        assert_eq!(dataset.x_pointings.len(), 1);
        assert_eq!(dataset.y_pointings.len(), 1);
        assert_eq!(dataset.z_pointings.len(), 1);
        assert_eq!(dataset.phi.len(), 1);
        assert_eq!(dataset.chi_local.len(), 1);
        assert_eq!(dataset.psi_local.len(), 1);
        assert_eq!(dataset.distance.len(), 1);
        assert_eq!(events.attitude.len(), 1);
    }
}
