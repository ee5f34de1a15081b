//! Netpbm (PBM/PGM/PPM/PAM) format support
//!
//! Parses all eight magic variants, including the self-describing PAM form
//! and the packed `P7 332` RGB byte format, into a uniform [`ImageBuffer`],
//! and serializes buffers back out in binary form.

mod decode;
mod encode;
mod header;
mod types;

pub use decode::decode;
pub use encode::{encode, write_to};
pub use header::{Header, Magic, parse_header, parse_pam_header, parse_pnm_header};
pub use types::{ImageBuffer, SampleKind};
