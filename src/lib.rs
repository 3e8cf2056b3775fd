pub mod attitude;
pub mod constants;
pub mod events;
pub mod gammatra_errors;
pub mod geometry;
pub mod response;

pub use attitude::{Attitude, ReferenceFrame};
pub use events::dataset_writer::write_unbinned_output;
pub use events::{EventDataset, ReconstructedEvents};
pub use gammatra_errors::GammatraError;
