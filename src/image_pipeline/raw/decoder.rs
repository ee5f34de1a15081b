use std::path::Path;

use crate::image_pipeline::common::error::Result;

/// How the external tool should render the RAW file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Demosaiced 16-bit output with camera white balance.
    Color,
    /// Unscaled, undemosaiced sensor data.
    Raw,
}

/// Seam for the external RAW-decoding tool. The production implementation
/// shells out to dcraw; tests substitute mocks.
pub trait RawDecoder {
    /// Decode the RAW file and return the tool's Netpbm output stream.
    fn decode_to_netpbm(&self, path: &Path, mode: DecodeMode) -> Result<Vec<u8>>;

    /// Return the tool's verbose identification report for the file.
    fn identify(&self, path: &Path) -> Result<String>;
}
