use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::image_pipeline::{
    channel::extract_channel,
    common::error::{ConversionError, Result},
    fits::{ConversionConfig, FitrsWriter, FitsImageWriter, fits_destination},
    netpbm,
    raw::{DcrawDecoder, ExifMetadata, RawDecoder},
};

/// Single-shot RAW → FITS conversion, generic over the external decoder and
/// the FITS container seam.
pub struct RawToFitsPipeline<D: RawDecoder, W: FitsImageWriter> {
    decoder: D,
    writer: W,
    config: ConversionConfig,
}

impl RawToFitsPipeline<DcrawDecoder, FitrsWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            decoder: DcrawDecoder,
            writer: FitrsWriter,
            config,
        }
    }
}

impl<D: RawDecoder, W: FitsImageWriter> RawToFitsPipeline<D, W> {
    pub fn with_custom(decoder: D, writer: W, config: ConversionConfig) -> Self {
        Self {
            decoder,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }
        if width == 0 || height == 0 {
            return Err(ConversionError::Format(format!(
                "invalid image dimensions: {width}x{height}"
            )));
        }
        Ok(())
    }

    /// Convert one RAW file, returning the path of the FITS file written.
    ///
    /// The output file is only created after the Netpbm stream has been
    /// fully decoded and the channel extracted; a failure at any stage
    /// leaves no partial output behind.
    #[instrument(skip(self, input_path))]
    pub fn convert_file<P: AsRef<Path>>(&self, input_path: P) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        let channel = self.config.channel;

        info!(
            input = %input_path.display(),
            channel = channel.label(),
            "Converting file"
        );

        let netpbm_stream = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.decoder
                .decode_to_netpbm(input_path, channel.decode_mode())?
        };

        let metadata = {
            let _span = tracing::info_span!("read_metadata").entered();
            let report = self.decoder.identify(input_path)?;
            ExifMetadata::parse(&report)?
        };

        let image = {
            let _span =
                tracing::info_span!("parse_netpbm", stream_len = netpbm_stream.len()).entered();
            netpbm::decode(&netpbm_stream)?
        };

        self.validate_dimensions(image.width(), image.height())?;

        let plane = {
            let _span = tracing::info_span!("extract_channel").entered();
            extract_channel(&image, channel)?
        };

        let destination =
            fits_destination(input_path, channel.file_tag(), self.config.max_rename_attempts)?;

        {
            let _span =
                tracing::info_span!("write_fits", destination = %destination.display()).entered();
            self.writer
                .write_fits(&plane, &metadata, channel.label(), &destination)?;
        }

        info!(
            width = plane.width(),
            height = plane.height(),
            destination = %destination.display(),
            "Conversion complete"
        );
        Ok(destination)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}
