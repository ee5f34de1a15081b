//! Pipeline conversions module
//!
//! Orchestration of the RAW → Netpbm → channel plane → FITS flow.

mod raw_to_fits;

pub use raw_to_fits::RawToFitsPipeline;
