//! Color channel selection and extraction

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::netpbm::ImageBuffer;
use crate::image_pipeline::raw::DecodeMode;

/// Which plane of the decoded image ends up in the FITS file.
///
/// `Raw` is the no-extraction sentinel: the unscaled sensor data is passed
/// through whole, without demosaicing or channel slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelect {
    Red,
    Green,
    Blue,
    Raw,
}

impl ChannelSelect {
    /// Map the CLI color index (0..=3) to a selector.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ChannelSelect::Red),
            1 => Some(ChannelSelect::Green),
            2 => Some(ChannelSelect::Blue),
            3 => Some(ChannelSelect::Raw),
            _ => None,
        }
    }

    /// Human-readable name, also the FITS FILTER header value.
    pub fn label(&self) -> &'static str {
        match self {
            ChannelSelect::Red => "Red",
            ChannelSelect::Green => "Green",
            ChannelSelect::Blue => "Blue",
            ChannelSelect::Raw => "Raw",
        }
    }

    /// Tag appended to the output filename stem.
    pub fn file_tag(&self) -> &'static str {
        match self {
            ChannelSelect::Red => "R",
            ChannelSelect::Green => "G",
            ChannelSelect::Blue => "B",
            ChannelSelect::Raw => "RAW",
        }
    }

    /// Channel position in the interleaved sample layout; `None` for the
    /// pass-through selector.
    pub fn channel_index(&self) -> Option<usize> {
        match self {
            ChannelSelect::Red => Some(0),
            ChannelSelect::Green => Some(1),
            ChannelSelect::Blue => Some(2),
            ChannelSelect::Raw => None,
        }
    }

    /// How the external tool must decode the RAW file for this selector.
    pub fn decode_mode(&self) -> DecodeMode {
        match self {
            ChannelSelect::Raw => DecodeMode::Raw,
            _ => DecodeMode::Color,
        }
    }
}

/// Extract one channel as a depth-1 buffer, or pass the buffer through
/// unchanged for [`ChannelSelect::Raw`]. Width, height and max value are
/// preserved.
pub fn extract_channel(image: &ImageBuffer, select: ChannelSelect) -> Result<ImageBuffer> {
    let Some(index) = select.channel_index() else {
        return Ok(image.clone());
    };
    if index >= image.depth() {
        return Err(ConversionError::ChannelRange {
            index,
            depth: image.depth(),
        });
    }
    let samples: Vec<u16> = image
        .samples()
        .iter()
        .copied()
        .skip(index)
        .step_by(image.depth())
        .collect();
    ImageBuffer::from_samples(image.width(), image.height(), 1, image.max_value(), samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_fixture() -> ImageBuffer {
        // 2x2 RGB where each channel is recognizable: R=10x, G=20x, B=30x.
        let mut samples = Vec::new();
        for pixel in 0..4u16 {
            samples.extend_from_slice(&[10 + pixel, 20 + pixel, 30 + pixel]);
        }
        ImageBuffer::from_samples(2, 2, 3, 255, samples).unwrap()
    }

    #[test]
    fn extracts_middle_channel() {
        let image = rgb_fixture();
        let green = extract_channel(&image, ChannelSelect::Green).unwrap();
        assert_eq!(green.depth(), 1);
        assert_eq!(green.width(), 2);
        assert_eq!(green.height(), 2);
        assert_eq!(green.max_value(), 255);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(green.sample(x, y, 0), image.sample(x, y, 1));
            }
        }
    }

    #[test]
    fn raw_select_passes_buffer_through() {
        let image = rgb_fixture();
        let out = extract_channel(&image, ChannelSelect::Raw).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let gray = ImageBuffer::from_samples(2, 1, 1, 255, vec![1, 2]).unwrap();
        let err = extract_channel(&gray, ChannelSelect::Blue).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::ChannelRange { index: 2, depth: 1 }
        ));
    }

    #[test]
    fn index_zero_on_depth_one_buffer_is_valid() {
        let gray = ImageBuffer::from_samples(2, 1, 1, 255, vec![1, 2]).unwrap();
        let out = extract_channel(&gray, ChannelSelect::Red).unwrap();
        assert_eq!(out, gray);
    }

    #[test]
    fn cli_index_mapping() {
        assert_eq!(ChannelSelect::from_index(0), Some(ChannelSelect::Red));
        assert_eq!(ChannelSelect::from_index(3), Some(ChannelSelect::Raw));
        assert_eq!(ChannelSelect::from_index(4), None);
        assert_eq!(ChannelSelect::Green.file_tag(), "G");
        assert_eq!(ChannelSelect::Raw.file_tag(), "RAW");
    }
}
