//! # Columnar dataset output
//!
//! Serializes an [`EventDataset`](crate::events::EventDataset) as a
//! **gzip-compressed CSV table**, one column per observable with the physical
//! unit attached to the column name.
//!
//! ## Columns
//! -----------------
//! The header carries the canonical column names and units
//! ([`COLUMN_NAMES`]/[`COLUMN_UNITS`]), with the `[lon, lat]` pointing pairs
//! flattened into `_lon`/`_lat` column pairs, e.g. `Xpointings_lon [rad]`.
//! The galactic chi/psi columns are part of the contract but are never
//! populated by the reconstruction; their cells are written empty.

use std::fs::File;

use camino::Utf8Path;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use crate::constants::{COLUMN_NAMES, COLUMN_UNITS};
use crate::events::EventDataset;
use crate::gammatra_errors::GammatraError;

/// Indices of the `[lon, lat]` pointing columns inside [`COLUMN_NAMES`].
const POINTING_COLUMNS: [usize; 3] = [2, 3, 4];

/// Build the CSV header: one `name [unit]` entry per scalar column, two per
/// pointing column.
fn csv_header() -> Vec<String> {
    COLUMN_NAMES
        .iter()
        .zip(COLUMN_UNITS.iter())
        .enumerate()
        .flat_map(|(idx, (name, unit))| {
            if POINTING_COLUMNS.contains(&idx) {
                vec![
                    format!("{name}_lon [{unit}]"),
                    format!("{name}_lat [{unit}]"),
                ]
            } else {
                vec![format!("{name} [{unit}]")]
            }
        })
        .collect()
}

/// Format a scalar cell, with absent values (ragged columns) left empty.
fn scalar_cell(column: &[f64], row: usize) -> String {
    column.get(row).map(|v| v.to_string()).unwrap_or_default()
}

/// Format one half of a pointing cell, empty when the row is absent.
fn pointing_cell(column: &[[f64; 2]], row: usize, component: usize) -> String {
    column
        .get(row)
        .map(|pair| pair[component].to_string())
        .unwrap_or_default()
}

/// Write the reconstructed dataset as a gzip-compressed CSV table.
///
/// Arguments
/// -----------------
/// * `dataset` – The reconstructed observation set.
/// * `outfile` – Output path; the file is created or truncated.
///
/// Return
/// ----------
/// * `Ok(())` once the table is fully written and the gzip stream finalized,
///   or a [`GammatraError`] on I/O or CSV failure.
///
/// Note
/// ----
/// * The row count is the longest populated column; shorter columns (only
///   possible for the always-empty galactic sequences, or datasets built from
///   hand-assembled raw data) yield empty cells rather than truncating rows.
pub fn write_unbinned_output(
    dataset: &EventDataset,
    outfile: &Utf8Path,
) -> Result<(), GammatraError> {
    let encoder = GzEncoder::new(File::create(outfile)?, Compression::default());
    let mut writer = csv::Writer::from_writer(encoder);

    writer.write_record(csv_header())?;

    let rows = [
        dataset.energies.len(),
        dataset.time_tags.len(),
        dataset.x_pointings.len(),
        dataset.y_pointings.len(),
        dataset.z_pointings.len(),
        dataset.phi.len(),
        dataset.chi_local.len(),
        dataset.psi_local.len(),
        dataset.distance.len(),
        dataset.chi_galactic.len(),
        dataset.psi_galactic.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);

    for row in 0..rows {
        let mut record: Vec<String> = Vec::with_capacity(14);
        record.push(scalar_cell(&dataset.energies, row));
        record.push(scalar_cell(&dataset.time_tags, row));
        for component in 0..2 {
            record.push(pointing_cell(&dataset.x_pointings, row, component));
        }
        for component in 0..2 {
            record.push(pointing_cell(&dataset.y_pointings, row, component));
        }
        for component in 0..2 {
            record.push(pointing_cell(&dataset.z_pointings, row, component));
        }
        record.push(scalar_cell(&dataset.phi, row));
        record.push(scalar_cell(&dataset.chi_local, row));
        record.push(scalar_cell(&dataset.psi_local, row));
        record.push(scalar_cell(&dataset.distance, row));
        record.push(scalar_cell(&dataset.chi_galactic, row));
        record.push(scalar_cell(&dataset.psi_galactic, row));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let encoder = writer
        .into_inner()
        .map_err(|err| GammatraError::IoError(err.into_error()))?;
    encoder.finish()?;

    info!("unbinned dataset written to {outfile} ({rows} rows)");
    Ok(())
}
