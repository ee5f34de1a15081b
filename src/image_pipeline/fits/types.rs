//! Conversion configuration types

use crate::image_pipeline::channel::ChannelSelect;
use crate::image_pipeline::fits::destination::MAX_RENAME_ATTEMPTS;

/// Configuration for RAW to FITS conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Channel written into the FITS image
    pub channel: ChannelSelect,
    /// Whether to validate image dimensions before writing
    pub validate_dimensions: bool,
    /// Upper bound on rename attempts when the destination name is taken
    pub max_rename_attempts: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            channel: ChannelSelect::Green,
            validate_dimensions: true,
            max_rename_attempts: MAX_RENAME_ATTEMPTS,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    channel: Option<ChannelSelect>,
    validate_dimensions: Option<bool>,
    max_rename_attempts: Option<usize>,
}

impl ConversionConfigBuilder {
    pub fn channel(mut self, channel: ChannelSelect) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_rename_attempts(mut self, attempts: usize) -> Self {
        self.max_rename_attempts = Some(attempts);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            channel: self.channel.unwrap_or(default.channel),
            validate_dimensions: self
                .validate_dimensions
                .unwrap_or(default.validate_dimensions),
            max_rename_attempts: self
                .max_rename_attempts
                .unwrap_or(default.max_rename_attempts),
        }
    }
}
