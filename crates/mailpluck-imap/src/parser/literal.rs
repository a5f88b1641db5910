//! Literal framing for single-section FETCH responses.
//!
//! A FETCH response for one body section starts with a status line such as
//! `* 3 FETCH (BODY[HEADER.FIELDS (TO)] {23}` followed by CRLF, and the 23
//! literal bytes come right after that CRLF. The framer inspects that first
//! line only. It never consumes anything, so the caller can decide how many
//! bytes to discard and how many to deliver.

use mailpluck_mime::find;

use super::response::parse_number;
use crate::error::Missing;
use crate::types::{Section, SeqNum};
use crate::{Error, Result};

/// Location of a literal announced by a FETCH line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralFrame {
    /// Sequence number of the message the literal belongs to.
    pub seq: SeqNum,
    /// Announced literal length in bytes.
    pub len: usize,
    /// Offset of the first literal byte, just past the line's CRLF.
    pub offset: usize,
}

impl LiteralFrame {
    /// Offset one past the last literal byte, or `None` if the announced
    /// length does not fit in `usize` past the offset.
    #[must_use]
    pub const fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.len)
    }
}

/// Matches `* <seq> FETCH (BODY[<section>] {<N>}\r\n` at the start of
/// `chunk`.
///
/// Keywords are compared ignoring ASCII case. The line must end right after
/// the closing brace.
///
/// # Errors
///
/// Returns [`Error::NotFound`] naming the message or header field if the first
/// line does not announce a literal for `section`.
pub fn frame_literal(chunk: &[u8], section: Section) -> Result<LiteralFrame> {
    let not_found = || Error::NotFound(Missing::from(section));

    let line_end = find(chunk, b"\r\n").ok_or_else(not_found)?;
    let line = &chunk[..line_end];

    let rest = line.strip_prefix(b"* ").ok_or_else(not_found)?;
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    let seq = parse_number(&rest[..digits])
        .and_then(SeqNum::new)
        .ok_or_else(not_found)?;

    let rest = strip_prefix_ignore_case(&rest[digits..], b" FETCH (").ok_or_else(not_found)?;
    let rest = strip_prefix_ignore_case(rest, section.response_item().as_bytes())
        .ok_or_else(not_found)?;
    let count = rest
        .strip_prefix(b" {")
        .and_then(|r| r.strip_suffix(b"}"))
        .ok_or_else(not_found)?;
    if !count.iter().all(u8::is_ascii_digit) {
        return Err(not_found());
    }
    let len = std::str::from_utf8(count)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(not_found)?;

    tracing::trace!(seq = seq.get(), len, "literal announced");
    Ok(LiteralFrame {
        seq,
        len,
        offset: line_end + 2,
    })
}

pub(crate) fn strip_prefix_ignore_case<'a>(input: &'a [u8], prefix: &[u8]) -> Option<&'a [u8]> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &input[prefix.len()..])
}
