//! Content transfer encodings.
//!
//! Only the three encodings a readable plain-text part may use are modelled.
//! Body text is handed out as found; [`decode_quoted_printable`] is there for
//! callers that explicitly ask for decoded output.

use std::fmt;

use crate::error::{Error, Result};
use crate::search::find;

/// Transfer encodings accepted for the plain-text part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit text.
    EightBit,
}

impl TransferEncoding {
    /// All accepted encodings.
    pub const ALL: [Self; 3] = [Self::QuotedPrintable, Self::SevenBit, Self::EightBit];

    /// The full header line prefix that announces this encoding.
    #[must_use]
    pub const fn header(self) -> &'static [u8] {
        match self {
            Self::QuotedPrintable => b"Content-Transfer-Encoding: quoted-printable",
            Self::SevenBit => b"Content-Transfer-Encoding: 7bit",
            Self::EightBit => b"Content-Transfer-Encoding: 8bit",
        }
    }

    /// Finds the earliest accepted `Content-Transfer-Encoding` header in
    /// `text`.
    ///
    /// Returns the encoding, the offset of the header and the offset just
    /// past the encoding name.
    #[must_use]
    pub fn locate(text: &[u8]) -> Option<(Self, usize, usize)> {
        Self::ALL
            .into_iter()
            .filter_map(|encoding| {
                let header = encoding.header();
                find(text, header).map(|start| (encoding, start, start + header.len()))
            })
            .min_by_key(|&(_, start, _)| start)
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
        }
    }
}

/// Decodes Quoted-Printable text (RFC 2045).
///
/// Soft line breaks (`=` before CRLF or LF) are removed and `=XX` escapes
/// become the byte they name. Hex digits are accepted in either case.
///
/// # Errors
///
/// Returns an error if the input contains an invalid or truncated escape.
pub fn decode_quoted_printable(text: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(text.len());
    let mut bytes = text.iter().copied().peekable();

    while let Some(b) = bytes.next() {
        if b != b'=' {
            result.push(b);
            continue;
        }

        // Soft line break
        if bytes.peek() == Some(&b'\r') {
            bytes.next();
            if bytes.peek() == Some(&b'\n') {
                bytes.next();
                continue;
            }
            return Err(Error::InvalidEncoding("bare CR after '='".to_string()));
        }
        if bytes.peek() == Some(&b'\n') {
            bytes.next();
            continue;
        }

        let (Some(hi), Some(lo)) = (bytes.next(), bytes.next()) else {
            return Err(Error::InvalidEncoding(
                "Incomplete escape sequence".to_string(),
            ));
        };
        let (Some(hi), Some(lo)) = (hex_value(hi), hex_value(lo)) else {
            return Err(Error::InvalidEncoding(format!(
                "Invalid hex: ={}{}",
                char::from(hi),
                char::from(lo)
            )));
        };
        result.push((hi << 4) | lo);
    }

    Ok(result)
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
