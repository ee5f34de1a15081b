//! Image processing pipeline module
//!
//! This module provides a structured approach to RAW → FITS conversion,
//! with separate modules for Netpbm parsing, channel extraction, the
//! external RAW decoder, FITS writing, and conversion orchestration.

pub mod channel;
pub mod common;
pub mod conversions;
pub mod fits;
pub mod netpbm;
pub mod raw;

pub use common::{ConversionError, Result};

pub use netpbm::{ImageBuffer, SampleKind};

pub use channel::{ChannelSelect, extract_channel};

pub use raw::{DcrawDecoder, DecodeMode, ExifMetadata, RawDecoder};

pub use fits::{
    ConversionConfig, ConversionConfigBuilder, FitrsWriter, FitsImageWriter, fits_destination,
};

pub use conversions::RawToFitsPipeline;
