//! Netpbm serialization
//!
//! The inverse of decoding for the binary variants. The header form is
//! chosen from the buffer's shape: PAM when the buffer has an alpha channel
//! or when explicitly requested, otherwise the minimal classic header.
//! ASCII token payloads are never produced, and the packed `P7 332` format
//! is read-only.

use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::netpbm::types::ImageBuffer;

/// Serialize a buffer into a complete header + payload byte stream.
pub fn encode(image: &ImageBuffer, pam: bool) -> Vec<u8> {
    let mut out = header_bytes(image, pam);
    append_payload(image, &mut out);
    out
}

/// Serialize a buffer to a writer.
pub fn write_to<W: Write>(image: &ImageBuffer, writer: &mut W, pam: bool) -> Result<()> {
    writer.write_all(&encode(image, pam))?;
    Ok(())
}

fn header_bytes(image: &ImageBuffer, pam: bool) -> Vec<u8> {
    let (w, h, m) = (image.width(), image.height(), image.max_value());
    let header = if pam || image.depth() == 4 {
        format!(
            "P7\nHEIGHT {h}\nWIDTH {w}\nDEPTH {}\nMAXVAL {m}\nTUPLTYPE {}\nENDHDR\n",
            image.depth(),
            image.sample_kind().tuple_type(),
        )
    } else if m == 1 {
        format!("P4 {w} {h}\n")
    } else if image.depth() == 1 {
        format!("P5 {w} {h} {m}\n")
    } else {
        format!("P6 {w} {h} {m}\n")
    };
    header.into_bytes()
}

fn append_payload(image: &ImageBuffer, out: &mut Vec<u8>) {
    if image.max_value() == 1 {
        append_packed_bits(image, out);
    } else if image.max_value() < 256 {
        out.extend(image.samples().iter().map(|&s| s as u8));
    } else {
        for &sample in image.samples() {
            out.extend_from_slice(&sample.to_be_bytes());
        }
    }
}

/// Re-pack 0/1 samples MSB first along the width axis, one byte column per
/// channel, rows padded to a byte boundary. Mirrors the unpacking layout.
fn append_packed_bits(image: &ImageBuffer, out: &mut Vec<u8>) {
    let (width, height, depth) = (image.width(), image.height(), image.depth());
    let stride = width.div_ceil(8);
    for row in 0..height {
        for byte_col in 0..stride {
            for channel in 0..depth {
                let mut byte = 0u8;
                for bit in 0..8 {
                    let x = byte_col * 8 + bit;
                    if x < width && image.sample(x, row, channel) != 0 {
                        byte |= 1 << (7 - bit);
                    }
                }
                out.push(byte);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::netpbm::decode;

    fn roundtrip(image: &ImageBuffer, pam: bool) {
        let encoded = encode(image, pam);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(&decoded, image);
    }

    #[test]
    fn graymap_8bit_roundtrip() {
        let image =
            ImageBuffer::from_samples(3, 2, 1, 255, vec![0, 50, 100, 150, 200, 250]).unwrap();
        let encoded = encode(&image, false);
        assert!(encoded.starts_with(b"P5 3 2 255\n"));
        roundtrip(&image, false);
    }

    #[test]
    fn graymap_16bit_roundtrip() {
        let image =
            ImageBuffer::from_samples(2, 2, 1, 65535, vec![0, 256, 65534, 40000]).unwrap();
        let encoded = encode(&image, false);
        assert!(encoded.starts_with(b"P5 2 2 65535\n"));
        // Big-endian on the wire.
        assert_eq!(&encoded[13..17], &[0x00, 0x00, 0x01, 0x00]);
        roundtrip(&image, false);
    }

    #[test]
    fn pixmap_roundtrip() {
        let image =
            ImageBuffer::from_samples(2, 2, 3, 255, (0..12).collect::<Vec<u16>>()).unwrap();
        let encoded = encode(&image, false);
        assert!(encoded.starts_with(b"P6 2 2 255\n"));
        roundtrip(&image, false);
    }

    #[test]
    fn bitmap_roundtrip_with_row_padding() {
        let samples = vec![1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
        let image = ImageBuffer::from_samples(10, 1, 1, 1, samples).unwrap();
        let encoded = encode(&image, false);
        assert!(encoded.starts_with(b"P4 10 1\n"));
        assert_eq!(&encoded[8..], &[0xaa, 0x80]);
        roundtrip(&image, false);
    }

    #[test]
    fn alpha_buffer_forces_pam_header() {
        let image = ImageBuffer::from_samples(2, 1, 4, 255, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let encoded = encode(&image, false);
        assert!(encoded.starts_with(b"P7\nHEIGHT 1\nWIDTH 2\nDEPTH 4\nMAXVAL 255\n"));
        assert!(
            String::from_utf8_lossy(&encoded).contains("TUPLTYPE RGB_ALPHA\nENDHDR\n")
        );
        roundtrip(&image, false);
    }

    #[test]
    fn pam_form_on_request_roundtrip() {
        let image = ImageBuffer::from_samples(3, 1, 1, 255, vec![9, 8, 7]).unwrap();
        let encoded = encode(&image, true);
        assert!(encoded.starts_with(b"P7\n"));
        assert!(String::from_utf8_lossy(&encoded).contains("TUPLTYPE GRAYSCALE\n"));
        roundtrip(&image, true);
    }

    #[test]
    fn write_to_matches_encode() {
        let image = ImageBuffer::from_samples(2, 1, 1, 255, vec![3, 4]).unwrap();
        let mut out = Vec::new();
        write_to(&image, &mut out, false).unwrap();
        assert_eq!(out, encode(&image, false));
    }
}
