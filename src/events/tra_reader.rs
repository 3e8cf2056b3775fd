//! # MEGAlib tra Event Record Reader
//!
//! Utilities to parse **tra** event streams (`.tra` or `.tra.gz`) and turn them into
//! the raw per-event field sequences consumed by the reconstruction pipeline.
//!
//! ## Overview
//! -----------------
//! This module provides:
//! - A small error type [`ParseEventError`] describing tra parsing failures.
//! - A mutable parse context ([`TraParseContext`]) that owns all accumulator
//!   sequences plus the pending first-interaction buffer, and a per-line dispatch
//!   routine over the record tag.
//! - A crate-visible batch routine [`extract_tra`] that reads an entire file and
//!   returns the frozen [`RawEventData`].
//!
//! ## Record format
//! -----------------
//! Each line is whitespace-delimited; the first token is the record tag:
//! - `CE` – scattered-gamma energy (token 1) and recoil-electron energy (token 3),
//!   both in **keV**. Total energy and Compton scattering angle are derived here.
//! - `TI` – time tag in **Unix seconds**.
//! - `ET` – event-type label, kept unparsed.
//! - `GX` / `GZ` – spacecraft X/Z axis longitude/latitude in **degrees**, stored
//!   in **radians**.
//! - `CH 0` / `CH 1` – first/second interaction position in **cm**; the position
//!   delta is appended once the pair is complete.
//! - Any other tag (including higher `CH` indices) is silently skipped.
//!
//! ## Error Handling
//! -----------------
//! A malformed line (too few tokens, unparsable float) or a `CH 1` with no prior
//! `CH 0` aborts the whole read, wrapped into
//! [`GammatraError::ParsingTraFileError`]. An out-of-domain Compton arccos
//! argument is **not** an error: the angle is recorded as NaN so that all
//! observable sequences stay aligned.
//!
//! ## See also
//! ------------
//! * [`RawEventData`] – Frozen parser output.
//! * [`crate::events::ReconstructedEvents`] – Downstream reconstruction.
use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use flate2::read::GzDecoder;
use nalgebra::Vector3;
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::{
    Centimeter, KiloElectronVolt, Radian, UnixSecond, ELECTRON_REST_ENERGY,
};
use crate::gammatra_errors::GammatraError;

/// Line-level parsing errors for tra event records.
///
/// Variants
/// -----------------
/// * `TooShortLine` – The line has fewer tokens than its tag requires; payload
///   carries the offending line.
/// * `InvalidFloat` – A numeric token failed to parse; payload carries the token.
/// * `UnpairedInteraction` – A `CH 1` record appeared before any `CH 0` record.
#[derive(Error, Debug, PartialEq)]
pub enum ParseEventError {
    #[error("The line has too few tokens for its tag: {0}")]
    TooShortLine(String),
    #[error("Invalid float value: {0}")]
    InvalidFloat(String),
    #[error("A 'CH 1' record was found before any 'CH 0' record")]
    UnpairedInteraction,
}

/// Raw per-event field sequences accumulated from a tra stream.
///
/// Angles are stored in **radians** (`GX`/`GZ` longitudes still in the parsed
/// `[0, 2π)` range), energies in **keV**, positions in **cm**. Sequences grow
/// independently per tag; for well-formed input they end up equal length.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawEventData {
    /// Total photon energy per `CE` record
    pub energies: Vec<KiloElectronVolt>,
    /// Compton scattering angle per `CE` record (NaN when out of domain)
    pub phi: Vec<Radian>,
    /// Time tag per `TI` record
    pub time_tags: Vec<UnixSecond>,
    /// Event-type label per `ET` record
    pub event_types: Vec<String>,
    /// X-axis longitude/latitude per `GX` record
    pub lon_x: Vec<Radian>,
    pub lat_x: Vec<Radian>,
    /// Z-axis longitude/latitude per `GZ` record
    pub lon_z: Vec<Radian>,
    pub lat_z: Vec<Radian>,
    /// Interaction position delta (second − first) per completed `CH` pair
    pub delta_x: Vec<Centimeter>,
    pub delta_y: Vec<Centimeter>,
    pub delta_z: Vec<Centimeter>,
}

/// Mutable parse context threaded through the line dispatch.
///
/// Owns the accumulator sequences and the single-slot pending first-interaction
/// buffer. The buffer is overwritten by each `CH 0` and retained after pairing,
/// so repeated `CH 1` records pair against the same first interaction.
#[derive(Debug, Default)]
struct TraParseContext {
    data: RawEventData,
    first_interaction: Option<Vector3<f64>>,
}

/// Fetch token `idx` as a float, surfacing the right [`ParseEventError`].
fn float_token(tokens: &[&str], idx: usize, line: &str) -> Result<f64, ParseEventError> {
    let token = tokens
        .get(idx)
        .ok_or_else(|| ParseEventError::TooShortLine(line.to_string()))?;
    token
        .parse::<f64>()
        .map_err(|_| ParseEventError::InvalidFloat(token.to_string()))
}

/// Parse an interaction position from tokens 2..5 of a `CH` record.
fn position_tokens(tokens: &[&str], line: &str) -> Result<Vector3<f64>, ParseEventError> {
    Ok(Vector3::new(
        float_token(tokens, 2, line)?,
        float_token(tokens, 3, line)?,
        float_token(tokens, 4, line)?,
    ))
}

impl TraParseContext {
    /// Dispatch a single record line on its tag.
    ///
    /// Blank lines and unknown tags are skipped; malformed lines abort the read.
    fn dispatch(&mut self, line: &str) -> Result<(), ParseEventError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let Some(&tag) = tokens.first() else {
            return Ok(());
        };

        match tag {
            "CE" => {
                let e_gamma = float_token(&tokens, 1, line)?;
                let e_electron = float_token(&tokens, 3, line)?;
                self.data.energies.push(e_gamma + e_electron);

                // Standard Compton formula, neglecting the electron motion
                // (which would lead to a Doppler broadening). A mis-measured
                // event can push the argument outside [-1, 1]; acos then
                // yields NaN, which is recorded to keep the sequences aligned.
                let arg =
                    1.0 - ELECTRON_REST_ENERGY * (1.0 / e_gamma - 1.0 / (e_electron + e_gamma));
                self.data.phi.push(arg.acos());
            }
            "TI" => {
                self.data.time_tags.push(float_token(&tokens, 1, line)?);
            }
            "ET" => {
                let label = tokens
                    .get(1)
                    .ok_or_else(|| ParseEventError::TooShortLine(line.to_string()))?;
                self.data.event_types.push(label.to_string());
            }
            "GX" => {
                self.data
                    .lon_x
                    .push(float_token(&tokens, 1, line)?.to_radians());
                self.data
                    .lat_x
                    .push(float_token(&tokens, 2, line)?.to_radians());
            }
            "GZ" => {
                self.data
                    .lon_z
                    .push(float_token(&tokens, 1, line)?.to_radians());
                self.data
                    .lat_z
                    .push(float_token(&tokens, 2, line)?.to_radians());
            }
            "CH" => match tokens.get(1) {
                Some(&"0") => {
                    self.first_interaction = Some(position_tokens(&tokens, line)?);
                }
                Some(&"1") => {
                    let second = position_tokens(&tokens, line)?;
                    let first = self
                        .first_interaction
                        .ok_or(ParseEventError::UnpairedInteraction)?;
                    let delta = second - first;
                    self.data.delta_x.push(delta.x);
                    self.data.delta_y.push(delta.y);
                    self.data.delta_z.push(delta.z);
                }
                // Higher interaction indices are not used by the reconstruction
                _ => {}
            },
            // Unknown tags are skipped, keeping the reader forward-compatible
            _ => {}
        }
        Ok(())
    }
}

/// Read a full **tra** event file, returning the raw per-event sequences.
///
/// The filename extension selects the decompression path: `.gz` files are read
/// through a gzip decoder, `.tra` files as plain text. Any other extension is a
/// fatal configuration error reported **before** any line is read. The stream
/// handle is closed on all exit paths, including parse failure.
///
/// Arguments
/// -----------------
/// * `trafile` – Path to the `.tra` or `.tra.gz` event file.
///
/// Return
/// ----------
/// * The frozen [`RawEventData`], or a [`GammatraError`] on configuration,
///   I/O, or parse failure.
///
/// See also
/// ------------
/// * [`crate::events::ReconstructedEvents::from_tra`] – Full reconstruction entry point.
pub(crate) fn extract_tra(trafile: &Utf8Path) -> Result<RawEventData, GammatraError> {
    let reader: Box<dyn BufRead> = if trafile.as_str().ends_with(".gz") {
        Box::new(BufReader::new(GzDecoder::new(File::open(trafile)?)))
    } else if trafile.as_str().ends_with(".tra") {
        Box::new(BufReader::new(File::open(trafile)?))
    } else {
        return Err(GammatraError::UnsupportedFileExtension(
            trafile.as_str().to_string(),
        ));
    };

    info!("reading tra file {trafile}");

    let mut context = TraParseContext::default();
    for line in reader.lines() {
        context.dispatch(&line?)?;
    }

    debug!(
        events = context.data.time_tags.len(),
        compton = context.data.energies.len(),
        "tra stream exhausted"
    );
    Ok(context.data)
}
