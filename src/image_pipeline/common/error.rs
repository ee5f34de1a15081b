use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Not a valid Netpbm stream: {0}")]
    Format(String),

    #[error("Channel index {index} out of range for image depth {depth}")]
    ChannelRange { index: usize, depth: usize },

    #[error("External RAW decoder failed: {0}")]
    ExternalTool(String),

    #[error("Failed to encode FITS image: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
