//! FITS writing module
//!
//! Destination naming, the container-library seam, and the fitrs-backed
//! writer that fills the fixed metadata schema.

mod destination;
mod fitrs_writer;
pub mod types;
mod writer;

pub use destination::{MAX_RENAME_ATTEMPTS, fits_destination};
pub use fitrs_writer::FitrsWriter;
pub use types::{ConversionConfig, ConversionConfigBuilder};
pub use writer::FitsImageWriter;
