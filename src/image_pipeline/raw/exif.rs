//! Exposure metadata scraped from the RAW decoder's verbose report.
//!
//! dcraw's `-i -v` output is line-oriented `Key: value` text; the values are
//! forwarded into FITS header fields as strings, so scraping stays at the
//! prefix-matching level. Only the timestamp is normalized, from dcraw's
//! ctime-style form to `YYYY-MM-DD HH:MM:SS`.

use chrono::NaiveDateTime;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Camera exposure metadata forwarded into the FITS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExifMetadata {
    /// Capture time as `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Exposure time in seconds, e.g. `1/197.0`.
    pub shutter: String,
    /// Aperture ratio, the N in f/N.
    pub aperture: String,
    /// ISO speed.
    pub iso: String,
    /// Focal length in mm.
    pub focal: String,
    /// Filename recorded in the RAW file.
    pub original_file: String,
    /// Camera make and model.
    pub camera: String,
}

impl ExifMetadata {
    /// Scrape all fields out of a verbose dcraw report. Every field is
    /// mandatory; a missing one is reported by name.
    pub fn parse(report: &str) -> Result<Self> {
        Ok(Self {
            timestamp: normalize_timestamp(&field(report, "Timestamp:")?)?,
            shutter: strip_unit(&field(report, "Shutter:")?, "sec"),
            aperture: field(report, "Aperture: f/")?,
            iso: field(report, "ISO speed:")?,
            focal: strip_unit(&field(report, "Focal length:")?, "mm"),
            original_file: field(report, "Filename:")?,
            camera: field(report, "Camera:")?,
        })
    }
}

fn field(report: &str, prefix: &str) -> Result<String> {
    report
        .lines()
        .find_map(|line| line.strip_prefix(prefix))
        .map(|value| value.trim().to_string())
        .ok_or_else(|| {
            ConversionError::ExternalTool(format!("RAW report is missing '{prefix}'"))
        })
}

fn strip_unit(value: &str, unit: &str) -> String {
    value.trim_end_matches(unit).trim().to_string()
}

/// dcraw prints ctime-style timestamps like `Sat Feb  2 14:14:14 2013`.
fn normalize_timestamp(value: &str) -> Result<String> {
    let parsed = NaiveDateTime::parse_from_str(value, "%a %b %e %H:%M:%S %Y").map_err(|_| {
        ConversionError::ExternalTool(format!("unparsable timestamp '{value}' in RAW report"))
    })?;
    Ok(parsed.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
Filename: IMG_0001.CR2
Timestamp: Sat Feb  2 14:14:14 2013
Camera: Canon EOS 550D
ISO speed: 800
Shutter: 1/197.0 sec
Aperture: f/4.0
Focal length: 50.0 mm
Embedded ICC profile: no
Number of raw images: 1
Thumb size:  5184 x 3456
Full size:   5344 x 3516
";

    #[test]
    fn scrapes_all_fields() {
        let meta = ExifMetadata::parse(REPORT).unwrap();
        assert_eq!(meta.timestamp, "2013-02-02 14:14:14");
        assert_eq!(meta.shutter, "1/197.0");
        assert_eq!(meta.aperture, "4.0");
        assert_eq!(meta.iso, "800");
        assert_eq!(meta.focal, "50.0");
        assert_eq!(meta.original_file, "IMG_0001.CR2");
        assert_eq!(meta.camera, "Canon EOS 550D");
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let report = REPORT.replace("Aperture: f/4.0\n", "");
        let err = ExifMetadata::parse(&report).unwrap_err();
        assert!(err.to_string().contains("Aperture"), "{err}");
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let report = REPORT.replace("Sat Feb  2 14:14:14 2013", "sometime last week");
        let err = ExifMetadata::parse(&report).unwrap_err();
        assert!(err.to_string().contains("timestamp"), "{err}");
    }
}
