//! FITS writing through the `fitrs` container library.

use std::path::Path;

use fitrs::{Fits, Hdu};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::fits::writer::FitsImageWriter;
use crate::image_pipeline::netpbm::ImageBuffer;
use crate::image_pipeline::raw::ExifMetadata;

/// FITS writer backed by `fitrs`.
pub struct FitrsWriter;

impl FitsImageWriter for FitrsWriter {
    fn write_fits(
        &self,
        image: &ImageBuffer,
        metadata: &ExifMetadata,
        filter: &str,
        destination: &Path,
    ) -> Result<()> {
        debug!(
            "Encoding FITS image: {}x{}x{}",
            image.width(),
            image.height(),
            image.depth()
        );

        // Samples are widened to i32; FITS 16-bit pixels are signed, so
        // 16-bit camera data needs the next size up.
        let data: Vec<i32> = image.samples().iter().map(|&s| i32::from(s)).collect();

        // Fastest-varying axis first: the interleaved channel (if any),
        // then x, then y.
        let shape: Vec<usize> = if image.depth() == 1 {
            vec![image.width(), image.height()]
        } else {
            vec![image.depth(), image.width(), image.height()]
        };

        let mut hdu = Hdu::new(&shape, data);
        hdu.insert("OBSTIME", metadata.timestamp.as_str());
        hdu.insert("EXPTIME", metadata.shutter.as_str());
        hdu.insert("APERTUR", metadata.aperture.as_str());
        hdu.insert("ISO", metadata.iso.as_str());
        hdu.insert("FOCAL", metadata.focal.as_str());
        hdu.insert("ORIGIN", metadata.original_file.as_str());
        hdu.insert("FILTER", filter);
        hdu.insert("CAMERA", metadata.camera.as_str());
        let creator = format!("FITS file created with cr2fits {}", env!("CARGO_PKG_VERSION"));
        hdu.insert("COMMENT", creator.as_str());
        hdu.insert("COMMENT", "EXPTIME is in seconds.");
        hdu.insert("COMMENT", "APERTUR is the ratio as in f/APERTUR");
        hdu.insert("COMMENT", "FOCAL is in mm");

        Fits::create(destination, hdu)
            .map_err(|e| ConversionError::Encode(e.to_string()))?;

        debug!("FITS file written to {}", destination.display());
        Ok(())
    }
}
