use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::netpbm::ImageBuffer;
use crate::image_pipeline::raw::ExifMetadata;

/// Seam for the FITS container library.
pub trait FitsImageWriter {
    /// Write the sample plane and metadata to `destination`, which must not
    /// exist yet.
    fn write_fits(
        &self,
        image: &ImageBuffer,
        metadata: &ExifMetadata,
        filter: &str,
        destination: &Path,
    ) -> Result<()>;
}
