//! Netpbm header grammars
//!
//! Two mutually exclusive header forms exist: the self-describing PAM form
//! (`P7` followed by named fields up to `ENDHDR`) and the classic PNM form
//! (magic token followed by whitespace-delimited integers). The leading
//! bytes select the grammar; each grammar is a pure function returning a
//! fully-initialized [`Header`].

use crate::image_pipeline::common::error::{ConversionError, Result};

/// A Netpbm stream cannot be shorter than the smallest valid header.
const MIN_STREAM_LEN: usize = 7;

/// The eight recognized magic tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    /// ASCII bitmap
    P1,
    /// ASCII graymap
    P2,
    /// ASCII pixmap
    P3,
    /// Binary bitmap
    P4,
    /// Binary graymap
    P5,
    /// Binary pixmap
    P6,
    /// Self-describing PAM
    P7,
    /// Packed 3/3/2-bit RGB, one byte per pixel (`P7 332`)
    Rgb332,
}

impl Magic {
    pub fn token(&self) -> &'static str {
        match self {
            Magic::P1 => "P1",
            Magic::P2 => "P2",
            Magic::P3 => "P3",
            Magic::P4 => "P4",
            Magic::P5 => "P5",
            Magic::P6 => "P6",
            Magic::P7 => "P7",
            Magic::Rgb332 => "P7 332",
        }
    }

    /// Tokens whose payload is whitespace-separated decimal text.
    pub fn is_ascii(&self) -> bool {
        matches!(self, Magic::P1 | Magic::P2 | Magic::P3)
    }

    /// Bitmap tokens carry no max-value field; it is implicitly 1.
    pub fn is_bitmap(&self) -> bool {
        matches!(self, Magic::P1 | Magic::P4)
    }

    /// Samples per pixel implied by a classic-grammar token.
    fn classic_depth(&self) -> usize {
        match self {
            Magic::P3 | Magic::P6 | Magic::Rgb332 => 3,
            _ => 1,
        }
    }
}

/// Parsed header fields plus the byte length of the header region, so the
/// payload offset is known. Produced fully initialized by one of the two
/// grammar functions and not retained after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub magic: Magic,
    /// Payload begins at this offset.
    pub header_len: usize,
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub max_value: u16,
    /// TUPLTYPE tags in declaration order; empty for classic headers.
    pub tuple_types: Vec<String>,
}

/// Detect the header grammar from the leading bytes and parse it.
///
/// A stream starting `P7` (other than the `P7 332` token) is always PAM;
/// `P1`..`P6` and `P7 332` are always classic. Anything else is rejected
/// with the offending bytes quoted.
pub fn parse_header(data: &[u8]) -> Result<Header> {
    if data.len() < MIN_STREAM_LEN {
        return Err(ConversionError::Format(format!(
            "stream too short: {} bytes",
            data.len()
        )));
    }
    if data.starts_with(b"P7 332") {
        parse_pnm_header(data)
    } else if data.starts_with(b"P7") {
        parse_pam_header(data)
    } else if data[0] == b'P' && (b'1'..=b'6').contains(&data[1]) {
        parse_pnm_header(data)
    } else {
        Err(unrecognized_magic(data))
    }
}

fn unrecognized_magic(data: &[u8]) -> ConversionError {
    let leading = &data[..data.len().min(16)];
    ConversionError::Format(format!(
        "unrecognized magic token in leading bytes {:?}",
        String::from_utf8_lossy(leading)
    ))
}

/// Parse the self-describing PAM grammar.
///
/// Line-oriented: `HEIGHT n`, `WIDTH n`, `DEPTH n`, `MAXVAL n` (all
/// mandatory, any order) and zero or more `TUPLTYPE <tag>` lines, with
/// comment and blank lines skippable, terminated by `ENDHDR`. Consumes no
/// bytes past the `ENDHDR` line.
pub fn parse_pam_header(data: &[u8]) -> Result<Header> {
    let mut lines = HeaderLines::new(data);

    let first = lines
        .next_line()?
        .ok_or_else(|| pam_error("missing magic line"))?;
    if first != b"P7" {
        return Err(pam_error("header must begin with a bare 'P7' line"));
    }

    let mut width = None;
    let mut height = None;
    let mut depth = None;
    let mut max_value = None;
    let mut tuple_types = Vec::new();

    loop {
        let line = lines
            .next_line()?
            .ok_or_else(|| pam_error("missing ENDHDR"))?;
        if line.is_empty() || line[0] == b'#' {
            continue;
        }
        if line == b"ENDHDR" {
            break;
        }

        let text = std::str::from_utf8(line)
            .map_err(|_| pam_error("header line is not ASCII"))?;
        let mut parts = text.split_ascii_whitespace();
        let key = parts.next().unwrap_or("");
        let value = parts.next();
        match key {
            "HEIGHT" => height = Some(pam_field(key, value)?),
            "WIDTH" => width = Some(pam_field(key, value)?),
            "DEPTH" => depth = Some(pam_field(key, value)?),
            "MAXVAL" => max_value = Some(pam_field(key, value)?),
            "TUPLTYPE" => {
                let tag = value.ok_or_else(|| pam_error("TUPLTYPE without a tag"))?;
                tuple_types.push(tag.to_string());
            }
            _ => return Err(pam_error(&format!("unknown field '{key}'"))),
        }
    }

    let width = width.ok_or_else(|| pam_error("missing WIDTH"))?;
    let height = height.ok_or_else(|| pam_error("missing HEIGHT"))?;
    let depth = depth.ok_or_else(|| pam_error("missing DEPTH"))?;
    let max_value = max_value.ok_or_else(|| pam_error("missing MAXVAL"))?;

    Ok(Header {
        magic: Magic::P7,
        header_len: lines.pos,
        width,
        height,
        depth,
        max_value: check_max_value(max_value)?,
        tuple_types,
    })
}

fn pam_error(detail: &str) -> ConversionError {
    ConversionError::Format(format!("bad PAM header: {detail}"))
}

fn pam_field(key: &str, value: Option<&str>) -> Result<usize> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| pam_error(&format!("{key} needs an integer value")))
}

/// Parse the classic PNM grammar.
///
/// Magic token, then whitespace-delimited width and height, then (except for
/// the bitmap tokens) a max-value field. `#` comments may appear between any
/// two fields. Exactly one whitespace byte after the final field terminates
/// the header; the payload begins at the next byte.
pub fn parse_pnm_header(data: &[u8]) -> Result<Header> {
    let (magic, mut pos) = if data.starts_with(b"P7 332") {
        (Magic::Rgb332, 6)
    } else {
        let magic = match data[1] {
            b'1' => Magic::P1,
            b'2' => Magic::P2,
            b'3' => Magic::P3,
            b'4' => Magic::P4,
            b'5' => Magic::P5,
            b'6' => Magic::P6,
            other => {
                return Err(ConversionError::Format(format!(
                    "unknown PNM magic 'P{}'",
                    other as char
                )));
            }
        };
        (magic, 2)
    };

    if !data.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        return Err(ConversionError::Format(format!(
            "no whitespace after magic '{}'",
            magic.token()
        )));
    }

    let (width, next) = read_header_uint(data, pos, "width")?;
    pos = next;
    let (height, next) = read_header_uint(data, pos, "height")?;
    pos = next;
    let max_value = if magic.is_bitmap() {
        1
    } else {
        let (value, next) = read_header_uint(data, pos, "max value")?;
        pos = next;
        check_max_value(value)?
    };

    // The single whitespace byte after the last field; the payload follows.
    if !data.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        return Err(ConversionError::Format(
            "header not terminated by whitespace".to_string(),
        ));
    }
    pos += 1;

    Ok(Header {
        magic,
        header_len: pos,
        width: check_dimension(width, "width")?,
        height: check_dimension(height, "height")?,
        depth: magic.classic_depth(),
        max_value,
        tuple_types: Vec::new(),
    })
}

/// Skip whitespace and `#` comment lines, then read a run of digits.
/// Returns the value and the offset just past its last digit.
fn read_header_uint(data: &[u8], mut pos: usize, what: &str) -> Result<(usize, usize)> {
    loop {
        match data.get(pos) {
            Some(b) if b.is_ascii_whitespace() => pos += 1,
            Some(&b'#') => {
                while data.get(pos).is_some_and(|&b| b != b'\n' && b != b'\r') {
                    pos += 1;
                }
            }
            _ => break,
        }
    }
    let start = pos;
    let mut value: usize = 0;
    while let Some(&b) = data.get(pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(usize::from(b - b'0')))
            .ok_or_else(|| ConversionError::Format(format!("{what} field out of range")))?;
        pos += 1;
    }
    if start == pos {
        return Err(ConversionError::Format(format!(
            "expected integer {what} field in header"
        )));
    }
    Ok((value, pos))
}

fn check_dimension(value: usize, what: &str) -> Result<usize> {
    if value == 0 {
        return Err(ConversionError::Format(format!("{what} must be positive")));
    }
    Ok(value)
}

fn check_max_value(value: usize) -> Result<u16> {
    if !(1..=65535).contains(&value) {
        return Err(ConversionError::Format(format!(
            "max value {value} outside 1..=65535"
        )));
    }
    Ok(value as u16)
}

/// Line iterator over the PAM header region, tracking the consumed length.
struct HeaderLines<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderLines<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The next `\n`-terminated line with the terminator and any trailing
    /// `\r` stripped, or `Ok(None)` once the data runs out mid-header.
    fn next_line(&mut self) -> Result<Option<&'a [u8]>> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        let rest = &self.data[self.pos..];
        let Some(end) = rest.iter().position(|&b| b == b'\n') else {
            return Ok(None);
        };
        self.pos += end + 1;
        let mut line = &rest[..end];
        while let [head @ .., b'\r'] = line {
            line = head;
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pam_header_with_comments_and_tags() {
        let data = b"P7\n# a comment\nWIDTH 4\nHEIGHT 2\n\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\npayload";
        let header = parse_header(data).unwrap();
        assert_eq!(header.magic, Magic::P7);
        assert_eq!(header.width, 4);
        assert_eq!(header.height, 2);
        assert_eq!(header.depth, 4);
        assert_eq!(header.max_value, 255);
        assert_eq!(header.tuple_types, vec!["RGB_ALPHA".to_string()]);
        assert_eq!(&data[header.header_len..], b"payload");
    }

    #[test]
    fn pam_header_missing_field_is_rejected() {
        let data = b"P7\nWIDTH 4\nHEIGHT 2\nDEPTH 1\nENDHDR\n";
        let err = parse_header(data).unwrap_err();
        assert!(err.to_string().contains("MAXVAL"), "{err}");
    }

    #[test]
    fn pam_header_without_endhdr_is_rejected() {
        let data = b"P7\nWIDTH 4\nHEIGHT 2\nDEPTH 1\nMAXVAL 255\n";
        assert!(parse_header(data).is_err());
    }

    #[test]
    fn p7_stream_never_falls_back_to_classic() {
        // Classic-looking fields after a bare P7 line are a PAM error, not
        // a PNM parse.
        let data = b"P7\n4 2 255\n\0\0\0\0\0\0\0\0";
        let err = parse_header(data).unwrap_err();
        assert!(err.to_string().contains("PAM"), "{err}");
    }

    #[test]
    fn classic_header_with_comments_between_fields() {
        let data = b"P6 # pixmap\n 4 # width\n 2 255\nXXX";
        let header = parse_header(data).unwrap();
        assert_eq!(header.magic, Magic::P6);
        assert_eq!(header.width, 4);
        assert_eq!(header.height, 2);
        assert_eq!(header.depth, 3);
        assert_eq!(header.max_value, 255);
        assert_eq!(&data[header.header_len..], b"XXX");
    }

    #[test]
    fn bitmap_header_has_implicit_max_value() {
        let header = parse_header(b"P4 10 1\nxx").unwrap();
        assert_eq!(header.magic, Magic::P4);
        assert_eq!(header.max_value, 1);
        assert_eq!(header.depth, 1);
        assert_eq!(&b"P4 10 1\nxx"[header.header_len..], b"xx");
    }

    #[test]
    fn packed_rgb_magic_uses_classic_grammar() {
        let header = parse_header(b"P7 332 2 2 255\n\0\0\0\0").unwrap();
        assert_eq!(header.magic, Magic::Rgb332);
        assert_eq!(header.depth, 3);
        assert_eq!(header.width, 2);
    }

    #[test]
    fn unrecognized_magic_is_quoted() {
        let err = parse_header(b"GIF89a something").unwrap_err();
        assert!(err.to_string().contains("GIF89a"), "{err}");
    }

    #[test]
    fn short_stream_is_rejected() {
        assert!(parse_header(b"P6 1").is_err());
    }

    #[test]
    fn out_of_range_max_value_is_rejected() {
        assert!(parse_header(b"P5 2 2 0\n\0\0\0\0").is_err());
        assert!(parse_header(b"P5 2 2 65536\n\0\0\0\0").is_err());
        assert!(parse_header(b"P5 2 2 65535\n\0\0\0\0\0\0\0\0").is_ok());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(parse_header(b"P5 0 2 255\n").is_err());
        assert!(parse_header(b"P5 2 0 255\n").is_err());
    }

    #[test]
    fn missing_separator_after_magic_is_rejected() {
        assert!(parse_header(b"P6123 2 255\n").is_err());
    }
}
