use thiserror::Error;

use crate::events::tra_reader::ParseEventError;

#[derive(Error, Debug)]
pub enum GammatraError {
    #[error("Input data file must have a '.tra' or '.gz' extension, got: {0}")]
    UnsupportedFileExtension(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error during the tra file parsing: {0}")]
    ParsingTraFileError(#[from] ParseEventError),

    #[error("Response matrix shape mismatch: {0} photon bins x {1} measured bins, matrix is {2}x{3}")]
    ResponseShapeMismatch(usize, usize, usize, usize),

    #[error("Energy axis needs at least two bin edges, got {0}")]
    InvalidEnergyAxis(usize),

    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for GammatraError {
    fn eq(&self, other: &Self) -> bool {
        use GammatraError::*;
        match (self, other) {
            (UnsupportedFileExtension(a), UnsupportedFileExtension(b)) => a == b,
            (ParsingTraFileError(a), ParsingTraFileError(b)) => a == b,
            (ResponseShapeMismatch(a, b, c, d), ResponseShapeMismatch(e, f, g, h)) => {
                (a, b, c, d) == (e, f, g, h)
            }
            (InvalidEnergyAxis(a), InvalidEnergyAxis(b)) => a == b,

            // Not comparable beyond the variant itself
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
