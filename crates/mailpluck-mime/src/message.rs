//! Plain-text extraction from `multipart/alternative` messages.

use crate::content_type::Boundary;
use crate::encoding::{TransferEncoding, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::search::{find, find_from};

const MIME_VERSION: &[u8] = b"MIME-Version: 1.0";
const MULTIPART_ALTERNATIVE: &[u8] = b"Content-Type: multipart/alternative;";
const TEXT_PLAIN: &[u8] = b"Content-Type: text/plain";
const CHARSET_UTF8: &[u8] = b"charset=UTF-8";
const CHARSET_UTF8_QUOTED: &[u8] = b"charset=\"UTF-8\"";

/// Blank line between part headers and part body.
const HEADER_BODY_SEPARATOR: &[u8] = b"\r\n\r\n";

/// The plain-text body part of a multipart message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPart {
    encoding: TransferEncoding,
    body: Vec<u8>,
}

impl TextPart {
    /// Transfer encoding announced in the part headers.
    #[must_use]
    pub const fn encoding(&self) -> TransferEncoding {
        self.encoding
    }

    /// Body text exactly as it appears in the message.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body text with the transfer encoding undone.
    ///
    /// Only quoted-printable changes anything; 7bit and 8bit bodies are
    /// returned as they are.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed quoted-printable escape.
    pub fn decoded(&self) -> Result<Vec<u8>> {
        match self.encoding {
            TransferEncoding::QuotedPrintable => decode_quoted_printable(&self.body),
            TransferEncoding::SevenBit | TransferEncoding::EightBit => Ok(self.body.clone()),
        }
    }

    /// Consumes the part and returns the raw body.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// A `multipart/alternative` message reduced to its boundary and first
/// plain-text part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeMessage {
    boundary: Boundary,
    text: TextPart,
}

impl MimeMessage {
    /// Scans a fully buffered raw message for its plain-text alternative.
    ///
    /// All searches are ASCII case-insensitive. The stages run in order and
    /// the first one that fails decides the error:
    ///
    /// 1. `MIME-Version: 1.0` must appear ([`Error::MimeVersionMissing`]).
    /// 2. `Content-Type: multipart/alternative;` must appear
    ///    ([`Error::NotMultipartAlternative`]).
    /// 3. A `boundary=` parameter must follow it ([`Error::BoundaryMissing`]).
    /// 4. `\r\n--{boundary}\r\n` must follow ([`Error::StartBoundaryMissing`]).
    /// 5. A part whose headers hold `Content-Type: text/plain` with
    ///    `charset=UTF-8` ([`Error::PlainTextPartMissing`]) and an accepted
    ///    `Content-Transfer-Encoding` ([`Error::EncodingMissing`]), in either
    ///    order, must follow. Headers of other parts are never consulted.
    /// 6. Four bytes of blank line are skipped.
    /// 7. The body runs to the next `\r\n--{boundary}`
    ///    ([`Error::EndBoundaryMissing`]).
    ///
    /// # Errors
    ///
    /// Returns the error of the first failed stage.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if find(raw, MIME_VERSION).is_none() {
            return Err(Error::MimeVersionMissing);
        }

        let multipart =
            find(raw, MULTIPART_ALTERNATIVE).ok_or(Error::NotMultipartAlternative)?;
        let boundary = Boundary::extract(&raw[multipart..])?;
        tracing::trace!(%boundary, "multipart boundary");

        let opening = boundary.opening_delimiter();
        let part_start = find_from(raw, &opening, multipart)
            .ok_or(Error::StartBoundaryMissing)?
            + opening.len();

        let (encoding, headers_end) = select_part_headers(raw, &boundary, part_start)?;

        let body_start = headers_end + HEADER_BODY_SEPARATOR.len();
        match raw.get(headers_end..body_start) {
            Some(skipped) if skipped == HEADER_BODY_SEPARATOR => {}
            Some(other) => tracing::warn!(
                skipped = ?String::from_utf8_lossy(other),
                "part headers not followed by a blank line"
            ),
            None => return Err(Error::EndBoundaryMissing),
        }

        let body_end =
            find_from(raw, &boundary.delimiter(), body_start).ok_or(Error::EndBoundaryMissing)?;

        Ok(Self {
            boundary,
            text: TextPart {
                encoding,
                body: raw[body_start..body_end].to_vec(),
            },
        })
    }

    /// The boundary token from the top-level content type.
    #[must_use]
    pub const fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// The selected plain-text part.
    #[must_use]
    pub const fn text(&self) -> &TextPart {
        &self.text
    }

    /// Consumes the message and returns the plain-text part.
    #[must_use]
    pub fn into_text(self) -> TextPart {
        self.text
    }
}

/// Resolves the plain-text content type and the transfer encoding of the
/// first UTF-8 `text/plain` part at or after `start`.
///
/// Both headers are looked for only inside that part's header block, which
/// runs from the delimiter opening the part to the first blank line after the
/// content type. Header order inside a part is free, so whichever header
/// comes first is resolved first and the other is searched after it. Returns
/// the encoding and the position just past the later of the two.
fn select_part_headers(
    raw: &[u8],
    boundary: &Boundary,
    start: usize,
) -> Result<(TransferEncoding, usize)> {
    let opening = boundary.opening_delimiter();
    let mut from = start;

    loop {
        let content_type_at =
            find_from(raw, TEXT_PLAIN, from).ok_or(Error::PlainTextPartMissing)?;
        let after_type = content_type_at + TEXT_PLAIN.len();
        let block_start = part_containing(raw, &opening, start, content_type_at);
        let block_end =
            find_from(raw, HEADER_BODY_SEPARATOR, content_type_at).unwrap_or(raw.len());

        let Some(charset_end) = locate_charset(raw, after_type, block_end) else {
            tracing::debug!(at = content_type_at, "text/plain part without UTF-8 charset");
            from = after_type;
            continue;
        };

        let (encoding, encoding_at, encoding_end) =
            locate_encoding(raw, block_start, block_end)?;
        if content_type_at < encoding_at {
            let (encoding, _, end) = locate_encoding(raw, charset_end, block_end)?;
            return Ok((encoding, end));
        }
        return Ok((encoding, charset_end.max(encoding_end)));
    }
}

/// Start of the part holding `at`: just past the last opening delimiter
/// between `start` and `at`.
fn part_containing(raw: &[u8], opening: &[u8], start: usize, at: usize) -> usize {
    let mut part = start;
    while let Some(next) = find_from(raw, opening, part).filter(|&next| next < at) {
        part = next + opening.len();
    }
    part
}

/// Finds the UTF-8 charset parameter in `raw[start..end]`.
///
/// Returns the position just past it.
fn locate_charset(raw: &[u8], start: usize, end: usize) -> Option<usize> {
    let block = raw.get(start..end)?;
    [CHARSET_UTF8, CHARSET_UTF8_QUOTED]
        .into_iter()
        .filter_map(|charset| find(block, charset).map(|at| (at, at + charset.len())))
        .min_by_key(|&(at, _)| at)
        .map(|(_, charset_end)| start + charset_end)
}

fn locate_encoding(
    raw: &[u8],
    start: usize,
    end: usize,
) -> Result<(TransferEncoding, usize, usize)> {
    let block = raw.get(start..end).ok_or(Error::EncodingMissing)?;
    TransferEncoding::locate(block)
        .map(|(encoding, at, end)| (encoding, start + at, start + end))
        .ok_or(Error::EncodingMissing)
}
