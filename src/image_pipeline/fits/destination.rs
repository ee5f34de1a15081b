//! Output file naming.
//!
//! The destination is derived from the input stem plus the channel tag. An
//! existing file is never overwritten; a numeric disambiguator is appended
//! instead, up to a bounded attempt count.

use std::path::{Path, PathBuf};

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Upper bound on rename attempts when the destination name is taken.
pub const MAX_RENAME_ATTEMPTS: usize = 9_000_000;

/// Compute `<stem>-<tag>.fits` next to the input, appending `-1`, `-2`, …
/// while the name is taken.
pub fn fits_destination(input: &Path, file_tag: &str, max_attempts: usize) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ConversionError::Encode(format!(
                "cannot derive an output name from '{}'",
                input.display()
            ))
        })?;
    let dir = input.parent().unwrap_or_else(|| Path::new(""));

    let candidate = dir.join(format!("{stem}-{file_tag}.fits"));
    if !candidate.exists() {
        return Ok(candidate);
    }
    for i in 1..=max_attempts {
        let candidate = dir.join(format!("{stem}-{file_tag}-{i}.fits"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(ConversionError::Io(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("no unused destination name after {max_attempts} attempts"),
    )))
}
