//! Netpbm payload decoding
//!
//! Turns a header + payload byte stream into an [`ImageBuffer`]. The
//! payload scheme follows from the magic token and max value: ASCII decimal
//! tokens, bit-packed rows, plain bytes, big-endian 16-bit words, or the
//! packed 3/3/2-bit RGB byte format.

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::netpbm::header::{Header, Magic, parse_header};
use crate::image_pipeline::netpbm::types::ImageBuffer;

/// Expansion table for the `P7 332` byte format: index is the raw payload
/// byte, value the (R, G, B) triple. Red and green occupy 3 bits scaled by
/// 36, blue 2 bits scaled by 85, so full scale lands near 255.
const RGB332_TABLE: [[u16; 3]; 256] = build_rgb332_table();

const fn build_rgb332_table() -> [[u16; 3]; 256] {
    let mut table = [[0u16; 3]; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = [
            ((i >> 5) as u16) * 36,
            (((i >> 2) & 0x7) as u16) * 36,
            ((i & 0x3) as u16) * 85,
        ];
        i += 1;
    }
    table
}

/// Decode a complete Netpbm stream into an image buffer.
///
/// Truncated payloads are hard errors; a stream must carry at least one
/// full frame of samples. Bytes beyond one frame are ignored.
pub fn decode(data: &[u8]) -> Result<ImageBuffer> {
    let header = parse_header(data)?;
    let payload = &data[header.header_len..];
    let sample_count = header.width * header.height * header.depth;

    let (samples, max_value) = if header.magic.is_ascii() {
        (decode_ascii(payload, sample_count)?, header.max_value)
    } else if header.magic == Magic::Rgb332 {
        // The packed byte expands to 8-bit-scaled channels regardless of
        // the declared max value.
        (decode_rgb332(payload, header.width * header.height)?, 255)
    } else if header.max_value == 1 {
        (decode_packed_bits(payload, &header)?, 1)
    } else if header.max_value < 256 {
        (decode_bytes(payload, sample_count)?, header.max_value)
    } else {
        (decode_words(payload, sample_count)?, header.max_value)
    };

    ImageBuffer::from_samples(header.width, header.height, header.depth, max_value, samples)
}

/// Whitespace-separated decimal samples (P1/P2/P3).
fn decode_ascii(payload: &[u8], sample_count: usize) -> Result<Vec<u16>> {
    let mut samples = Vec::with_capacity(sample_count);
    for token in payload
        .split(|b| b.is_ascii_whitespace())
        .filter(|t| !t.is_empty())
    {
        if samples.len() == sample_count {
            break;
        }
        let value = std::str::from_utf8(token)
            .ok()
            .and_then(|t| t.parse::<u16>().ok())
            .ok_or_else(|| {
                ConversionError::Format(format!(
                    "bad ASCII sample token {:?}",
                    String::from_utf8_lossy(token)
                ))
            })?;
        samples.push(value);
    }
    if samples.len() < sample_count {
        return Err(ConversionError::Format(format!(
            "ASCII payload truncated: expected {sample_count} samples, found {}",
            samples.len()
        )));
    }
    Ok(samples)
}

/// Bit-packed rows, MSB first along the width axis, each row padded to a
/// byte boundary. Padding bits beyond the width are discarded. For depths
/// above 1 each packed byte belongs to one channel, interleaved per byte
/// column.
fn decode_packed_bits(payload: &[u8], header: &Header) -> Result<Vec<u16>> {
    let (width, height, depth) = (header.width, header.height, header.depth);
    let stride = width.div_ceil(8);
    let row_bytes = stride * depth;
    let needed = row_bytes * height;
    if payload.len() < needed {
        return Err(truncated(needed, payload.len()));
    }

    let mut samples = Vec::with_capacity(width * height * depth);
    for row in 0..height {
        let row_data = &payload[row * row_bytes..][..row_bytes];
        for x in 0..width {
            for channel in 0..depth {
                let byte = row_data[(x / 8) * depth + channel];
                let bit = 7 - (x % 8);
                samples.push(u16::from((byte >> bit) & 1));
            }
        }
    }
    Ok(samples)
}

/// One byte per sample (max value 2..=255).
fn decode_bytes(payload: &[u8], sample_count: usize) -> Result<Vec<u16>> {
    if payload.len() < sample_count {
        return Err(truncated(sample_count, payload.len()));
    }
    Ok(payload[..sample_count].iter().map(|&b| u16::from(b)).collect())
}

/// Big-endian 16-bit samples (max value 256..=65535).
fn decode_words(payload: &[u8], sample_count: usize) -> Result<Vec<u16>> {
    let needed = sample_count * 2;
    if payload.len() < needed {
        return Err(truncated(needed, payload.len()));
    }
    Ok(payload[..needed]
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

/// One packed RGB byte per pixel, expanded through [`RGB332_TABLE`].
fn decode_rgb332(payload: &[u8], pixel_count: usize) -> Result<Vec<u16>> {
    if payload.len() < pixel_count {
        return Err(truncated(pixel_count, payload.len()));
    }
    let mut samples = Vec::with_capacity(pixel_count * 3);
    for &byte in &payload[..pixel_count] {
        samples.extend_from_slice(&RGB332_TABLE[byte as usize]);
    }
    Ok(samples)
}

fn truncated(needed: usize, actual: usize) -> ConversionError {
    ConversionError::Format(format!(
        "payload truncated: need {needed} bytes, have {actual}"
    ))
}
