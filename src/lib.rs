//! Convert RAW camera images such as Canon Raw or Nikon Raw to FITS.
//!
//! The heavy lifting of camera formats is delegated to an external `dcraw`
//! process; this crate parses its Netpbm output, extracts a color channel
//! (or passes raw sensor data through) and writes a FITS image carrying the
//! camera's exposure metadata.

pub mod image_pipeline;
pub mod logger;
