//! RAW decoding via the external `dcraw` tool.
//!
//! dcraw does all the camera-format work; this module only shells out and
//! captures its Netpbm stdout. `-c` keeps the output on stdout instead of a
//! sibling file, `-j` disables rotation so the frame matches the sensor.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::decoder::{DecodeMode, RawDecoder};

const DCRAW: &str = "dcraw";

/// RAW decoder backed by a `dcraw` binary on PATH.
pub struct DcrawDecoder;

impl DcrawDecoder {
    fn run(&self, args: &[&str], path: &Path) -> Result<Vec<u8>> {
        let output = Command::new(DCRAW)
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConversionError::ExternalTool(format!("{DCRAW} not found on PATH"))
                } else {
                    ConversionError::Io(e)
                }
            })?;
        if !output.status.success() {
            return Err(ConversionError::ExternalTool(format!(
                "{DCRAW} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}

impl RawDecoder for DcrawDecoder {
    fn decode_to_netpbm(&self, path: &Path, mode: DecodeMode) -> Result<Vec<u8>> {
        let args: &[&str] = match mode {
            // 16-bit output, camera white balance, fixed white level.
            DecodeMode::Color => &["-W", "-6", "-j", "-c"],
            // Raw sensor values, linear 16-bit, no demosaicing.
            DecodeMode::Raw => &["-D", "-4", "-j", "-c"],
        };
        debug!("Running {} {:?} on {}", DCRAW, args, path.display());
        let stream = self.run(args, path)?;
        debug!("{} produced {} bytes of Netpbm output", DCRAW, stream.len());
        Ok(stream)
    }

    fn identify(&self, path: &Path) -> Result<String> {
        let report = self.run(&["-i", "-v"], path)?;
        String::from_utf8(report).map_err(|_| {
            ConversionError::ExternalTool(format!("{DCRAW} report is not valid UTF-8"))
        })
    }
}
