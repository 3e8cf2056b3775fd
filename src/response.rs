//! # Spectral response of the detector
//!
//! Models how true photon energy maps to measured detector response: a
//! two-dimensional matrix binned in **photon energy** (Ei) × **measured
//! energy** (Em), in cm². This is an analysis layer separate from the event
//! reconstruction pipeline; it consumes nothing from the tra reader.
//!
//! ## Overview
//! -----------------
//! - [`EnergyAxis`] – contiguous energy bin edges in keV.
//! - [`SpectralResponse`] – the Ei × Em matrix, with:
//!   - the **effective area** (projection onto the Ei axis, lazily cached),
//!   - interpolation of the effective area at an arbitrary energy,
//!   - the **dispersion matrix** (per-Ei normalization by effective area),
//!     which gives the probability of measuring Em given a photon of Ei.

use nalgebra::{DMatrix, DVector};
use once_cell::sync::OnceCell;

use crate::constants::KiloElectronVolt;
use crate::gammatra_errors::GammatraError;

/// Contiguous energy bin edges, in keV.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyAxis {
    edges: Vec<KiloElectronVolt>,
}

impl EnergyAxis {
    /// Build an axis from bin edges.
    ///
    /// Arguments
    /// ---------
    /// * `edges`: strictly increasing bin edges; at least two are required
    ///
    /// Return
    /// ------
    /// * The axis, or [`GammatraError::InvalidEnergyAxis`] when fewer than two
    ///   edges are given.
    pub fn new(edges: Vec<KiloElectronVolt>) -> Result<Self, GammatraError> {
        if edges.len() < 2 {
            return Err(GammatraError::InvalidEnergyAxis(edges.len()));
        }
        Ok(EnergyAxis { edges })
    }

    /// Number of bins (one less than the number of edges).
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[KiloElectronVolt] {
        &self.edges
    }

    /// Arithmetic bin centers.
    pub fn centers(&self) -> Vec<KiloElectronVolt> {
        self.edges
            .windows(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]))
            .collect()
    }
}

/// Photon-energy × measured-energy response matrix, in cm².
///
/// Rows follow the photon (Ei) axis, columns the measured (Em) axis.
#[derive(Debug, Clone)]
pub struct SpectralResponse {
    photon_axis: EnergyAxis,
    measured_axis: EnergyAxis,
    matrix: DMatrix<f64>,
    effective_area: OnceCell<DVector<f64>>,
}

impl SpectralResponse {
    /// Build a response from its axes and matrix.
    ///
    /// Arguments
    /// ---------
    /// * `photon_axis`: true photon energy binning (Ei)
    /// * `measured_axis`: measured energy binning (Em)
    /// * `matrix`: `photon_axis.n_bins()` × `measured_axis.n_bins()` values in cm²
    ///
    /// Return
    /// ------
    /// * The response, or [`GammatraError::ResponseShapeMismatch`] when the
    ///   matrix shape disagrees with the axes.
    pub fn new(
        photon_axis: EnergyAxis,
        measured_axis: EnergyAxis,
        matrix: DMatrix<f64>,
    ) -> Result<Self, GammatraError> {
        if matrix.nrows() != photon_axis.n_bins() || matrix.ncols() != measured_axis.n_bins() {
            return Err(GammatraError::ResponseShapeMismatch(
                photon_axis.n_bins(),
                measured_axis.n_bins(),
                matrix.nrows(),
                matrix.ncols(),
            ));
        }
        Ok(SpectralResponse {
            photon_axis,
            measured_axis,
            matrix,
            effective_area: OnceCell::new(),
        })
    }

    pub fn photon_energy_axis(&self) -> &EnergyAxis {
        &self.photon_axis
    }

    pub fn measured_energy_axis(&self) -> &EnergyAxis {
        &self.measured_axis
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Effective area per photon-energy bin, in cm².
    ///
    /// Projection of the response onto the Ei axis (sum over all measured
    /// bins), computed once and cached.
    pub fn effective_area(&self) -> &DVector<f64> {
        self.effective_area.get_or_init(|| {
            DVector::from_iterator(
                self.matrix.nrows(),
                self.matrix.row_iter().map(|row| row.sum()),
            )
        })
    }

    /// Effective area interpolated at an arbitrary photon energy, in cm².
    ///
    /// Linear interpolation between bin centers, clamped to the first/last bin
    /// values outside the covered range.
    pub fn effective_area_at(&self, energy: KiloElectronVolt) -> f64 {
        let centers = self.photon_axis.centers();
        let aeff = self.effective_area();

        if energy <= centers[0] {
            return aeff[0];
        }
        if energy >= centers[centers.len() - 1] {
            return aeff[centers.len() - 1];
        }

        let upper = centers.partition_point(|&center| center < energy);
        let (c0, c1) = (centers[upper - 1], centers[upper]);
        let fraction = (energy - c0) / (c1 - c0);
        aeff[upper - 1] + fraction * (aeff[upper] - aeff[upper - 1])
    }

    /// Energy dispersion matrix: each photon-energy row normalized by its
    /// effective area, giving the probability of measuring Em for a photon
    /// of energy Ei.
    ///
    /// Zero effective areas in the first and last photon bins (under/overflow)
    /// are replaced by 1 before dividing, so empty edge bins normalize to zero
    /// rows instead of 0/0.
    pub fn dispersion_matrix(&self) -> DMatrix<f64> {
        let mut norm = self.effective_area().clone();
        let last = norm.len() - 1;
        if norm[0] == 0.0 {
            norm[0] = 1.0;
        }
        if norm[last] == 0.0 {
            norm[last] = 1.0;
        }

        let mut dispersion = self.matrix.clone();
        for (row_index, mut row) in dispersion.row_iter_mut().enumerate() {
            row /= norm[row_index];
        }
        dispersion
    }
}

#[cfg(test)]
mod response_test {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_response() -> SpectralResponse {
        let photon = EnergyAxis::new(vec![100.0, 200.0, 400.0, 800.0, 1600.0]).unwrap();
        let measured = EnergyAxis::new(vec![100.0, 400.0, 1600.0]).unwrap();
        let matrix = DMatrix::from_row_slice(
            4,
            2,
            &[
                0.0, 0.0, // underflow photon bin, no counts
                3.0, 1.0, //
                2.0, 6.0, //
                0.0, 0.0, // overflow photon bin, no counts
            ],
        );
        SpectralResponse::new(photon, measured, matrix).unwrap()
    }

    #[test]
    fn test_axis_validation() {
        assert_eq!(
            EnergyAxis::new(vec![100.0]),
            Err(GammatraError::InvalidEnergyAxis(1))
        );
        let axis = EnergyAxis::new(vec![100.0, 200.0, 400.0]).unwrap();
        assert_eq!(axis.n_bins(), 2);
        assert_eq!(axis.centers(), vec![150.0, 300.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let photon = EnergyAxis::new(vec![100.0, 200.0]).unwrap();
        let measured = EnergyAxis::new(vec![100.0, 200.0]).unwrap();
        let result = SpectralResponse::new(photon, measured, DMatrix::zeros(2, 3));
        assert_eq!(
            result.unwrap_err(),
            GammatraError::ResponseShapeMismatch(1, 1, 2, 3)
        );
    }

    #[test]
    fn test_effective_area_projection() {
        let response = sample_response();
        let aeff = response.effective_area();
        assert_eq!(aeff.as_slice(), &[0.0, 4.0, 8.0, 0.0]);
    }

    #[test]
    fn test_effective_area_interpolation() {
        let response = sample_response();
        // Centers: 150, 300, 600, 1200; aeff: 0, 4, 8, 0
        assert_relative_eq!(response.effective_area_at(300.0), 4.0);
        assert_relative_eq!(response.effective_area_at(450.0), 6.0);
        // Clamped outside the covered range
        assert_relative_eq!(response.effective_area_at(50.0), 0.0);
        assert_relative_eq!(response.effective_area_at(5000.0), 0.0);
    }

    #[test]
    fn test_dispersion_matrix_normalization() {
        let response = sample_response();
        let dispersion = response.dispersion_matrix();

        // Interior rows with nonzero effective area sum to 1
        assert_relative_eq!(dispersion.row(1).sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(dispersion.row(2).sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(dispersion[(1, 0)], 0.75, epsilon = 1e-12);

        // Under/overflow guard: empty edge rows stay zero instead of NaN
        assert_eq!(dispersion.row(0).sum(), 0.0);
        assert_eq!(dispersion.row(3).sum(), 0.0);
    }
}
