//! External RAW decoding module
//!
//! The camera-format work is delegated to an external tool; this module
//! holds the tool seam, the dcraw-backed implementation, and the metadata
//! scraper for its verbose report.

mod dcraw;
mod decoder;
mod exif;

pub use dcraw::DcrawDecoder;
pub use decoder::{DecodeMode, RawDecoder};
pub use exif::ExifMetadata;
