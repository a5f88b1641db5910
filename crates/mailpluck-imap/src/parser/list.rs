//! Subject listing over a buffered `FETCH 1:*` response.

use std::fmt;

use mailpluck_mime::{find, find_from, strip_leading_whitespace, unfold};

use super::literal::frame_literal;
use crate::types::{HeaderField, SeqNum};
use crate::{Error, Result};

const UNTAGGED_MARKER: &[u8] = b"* ";
const SUBJECT_PREFIX: &[u8] = b"\r\nSubject:";
const ENTRY_TERMINATOR: &[u8] = b"\r\n\r\n)\r\n";

/// One message in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxEntry {
    /// Message sequence number.
    pub seq: SeqNum,
    /// Unfolded subject, `None` when the message has none.
    pub subject: Option<String>,
}

impl fmt::Display for MailboxEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = self
            .subject
            .as_deref()
            .unwrap_or_else(|| HeaderField::Subject.placeholder());
        write!(f, "{}: {subject}", self.seq)
    }
}

/// Subjects of a mailbox in server response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxListing {
    entries: Vec<MailboxEntry>,
}

impl MailboxListing {
    /// Returns true if no message was listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of listed messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, MailboxEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a MailboxListing {
    type Item = &'a MailboxEntry;
    type IntoIter = std::slice::Iter<'a, MailboxEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for MailboxListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Parses every subject FETCH entry in `buf`.
///
/// Each `* <seq> FETCH (BODY[HEADER.FIELDS (SUBJECT)] {N}` line is followed by
/// its literal. The subject runs from `\r\nSubject:` to the entry terminator
/// `\r\n\r\n)\r\n`, then is left-trimmed and unfolded. Other untagged lines
/// are skipped and scanning resumes after each literal.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if a literal is cut short or a subject has no
/// terminator.
pub fn parse_subject_listing(buf: &[u8]) -> Result<MailboxListing> {
    let section = HeaderField::Subject.into();
    let mut entries = Vec::new();
    let mut pos = 0;

    while let Some(start) = find_from(buf, UNTAGGED_MARKER, pos) {
        let line = &buf[start..];
        let Ok(frame) = frame_literal(line, section) else {
            // Not a subject FETCH line: EXISTS, RECENT, FLAGS and the like.
            pos = find(line, b"\r\n").map_or(buf.len(), |end| start + end + 2);
            continue;
        };

        let literal_end = frame
            .end()
            .and_then(|end| end.checked_add(start))
            .filter(|&end| end <= buf.len())
            .ok_or_else(|| {
                Error::Protocol(format!("literal for message {} is truncated", frame.seq))
            })?;

        // The prefix may start with the CRLF closing the FETCH line.
        let search_region = &buf[start + frame.offset - 2..literal_end];
        let subject = match find(search_region, SUBJECT_PREFIX) {
            Some(found) => {
                let value_start = start + frame.offset - 2 + found + SUBJECT_PREFIX.len();
                let value_end = find_from(buf, ENTRY_TERMINATOR, value_start).ok_or_else(|| {
                    Error::Protocol(format!("subject end not found for message {}", frame.seq))
                })?;
                let raw = strip_leading_whitespace(&buf[value_start..value_end]);
                Some(String::from_utf8_lossy(&unfold(raw)).into_owned())
            }
            None => None,
        };

        tracing::trace!(seq = frame.seq.get(), ?subject, "listed message");
        entries.push(MailboxEntry {
            seq: frame.seq,
            subject,
        });
        pos = literal_end;
    }

    Ok(MailboxListing { entries })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fetch_line(seq: u32, literal: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "* {seq} FETCH (BODY[HEADER.FIELDS (SUBJECT)] {{{}}}\r\n",
            literal.len()
        )
        .into_bytes();
        out.extend_from_slice(literal);
        out.extend_from_slice(b")\r\n");
        out
    }

    #[test]
    fn test_folded_and_missing_subject() {
        let mut buf = fetch_line(1, b"Subject: a very long\r\n subject line\r\n\r\n");
        buf.extend(fetch_line(2, b"\r\n"));
        buf.extend_from_slice(b"A0003 OK Fetch completed\r\n");

        let listing = parse_subject_listing(&buf).unwrap();
        let lines: Vec<String> = listing.iter().map(ToString::to_string).collect();
        assert_eq!(lines, ["1: a very long subject line", "2: <No subject>"]);
    }

    #[test]
    fn test_empty_response() {
        let listing = parse_subject_listing(b"A0003 OK Fetch completed\r\n").unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.to_string(), "");
    }

    #[test]
    fn test_skips_other_untagged_lines() {
        let mut buf = b"* 2 EXISTS\r\n* 1 RECENT\r\n".to_vec();
        buf.extend(fetch_line(1, b"Subject: One\r\n\r\n"));
        buf.extend_from_slice(b"* 3 EXISTS\r\n");
        buf.extend(fetch_line(2, b"Subject:\tTwo\r\n\r\n"));

        let listing = parse_subject_listing(&buf).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.to_string(), "1: One\n2: Two\n");
    }

    #[test]
    fn test_subject_prefix_ignores_case() {
        let buf = fetch_line(5, b"SUBJECT: loud\r\n\r\n");
        let listing = parse_subject_listing(&buf).unwrap();
        let entry = listing.iter().next().unwrap();
        assert_eq!(entry.seq.get(), 5);
        assert_eq!(entry.subject.as_deref(), Some("loud"));
    }

    #[test]
    fn test_subject_marker_inside_literal_is_ignored() {
        let mut buf = fetch_line(1, b"Subject: * 9 FETCH stuff\r\n\r\n");
        buf.extend(fetch_line(2, b"Subject: next\r\n\r\n"));
        let listing = parse_subject_listing(&buf).unwrap();
        assert_eq!(listing.to_string(), "1: * 9 FETCH stuff\n2: next\n");
    }

    #[test]
    fn test_missing_terminator() {
        let buf = b"* 1 FETCH (BODY[HEADER.FIELDS (SUBJECT)] {14}\r\nSubject: Hi\r\nX";
        assert!(matches!(
            parse_subject_listing(buf),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn test_truncated_literal() {
        let buf = b"* 1 FETCH (BODY[HEADER.FIELDS (SUBJECT)] {99}\r\nSubject: Hi\r\n";
        assert!(matches!(
            parse_subject_listing(buf),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn test_oversized_literal_is_truncated() {
        let buf = format!(
            "* 1 FETCH (BODY[HEADER.FIELDS (SUBJECT)] {{{}}}\r\nSubject: x\r\n\r\n)\r\n",
            usize::MAX
        );
        assert!(matches!(
            parse_subject_listing(buf.as_bytes()),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn test_subject_in_next_literal_not_borrowed() {
        let mut buf = fetch_line(1, b"\r\n");
        buf.extend(fetch_line(2, b"Subject: second\r\n\r\n"));
        let listing = parse_subject_listing(&buf).unwrap();
        assert_eq!(listing.to_string(), "1: <No subject>\n2: second\n");
    }
}
