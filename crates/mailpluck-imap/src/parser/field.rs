//! Single header field extraction.
//!
//! `BODY[HEADER.FIELDS (<NAME>)]` returns the field line followed by the blank
//! line that ends the header block, e.g. `To: bob@example.com\r\n\r\n`. The
//! value is what lies between the label and the final CRLF.

use std::fmt;
use std::ops::Range;

use mailpluck_mime::unfold;

use crate::types::HeaderField;

/// Span of the raw field value within a literal of `len` bytes.
///
/// The value starts after the label and stops two bytes short of the end.
/// Returns `None` when the literal is too short to hold anything (the field
/// is blank or absent).
#[must_use]
pub fn field_span(len: usize, field: HeaderField) -> Option<Range<usize>> {
    if len <= 2 {
        return None;
    }
    let end = len - 2;
    Some(field.label_len().min(end)..end)
}

/// Extracts and unfolds a field value from its literal.
#[must_use]
pub fn extract_field(literal: &[u8], field: HeaderField) -> HeaderValue {
    let value = field_span(literal.len(), field)
        .and_then(|span| literal.get(span))
        .map(|raw| String::from_utf8_lossy(&unfold(raw)).into_owned());
    HeaderValue { field, value }
}

/// An extracted header field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderValue {
    /// Which field this is.
    pub field: HeaderField,
    /// The unfolded value, `None` when the field was blank or absent.
    pub value: Option<String>,
}

impl HeaderValue {
    /// The value, or the field's placeholder when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.value
            .as_deref()
            .unwrap_or_else(|| self.field.placeholder())
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.text();
        if text.is_empty() {
            write!(f, "{}:", self.field)
        } else {
            write!(f, "{}{text}", self.field.label())
        }
    }
}

/// The four summary fields of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSummary {
    /// `From`, `To`, `Date` and `Subject`, in that order.
    pub fields: Vec<HeaderValue>,
}

impl HeaderSummary {
    /// Looks up one field.
    #[must_use]
    pub fn get(&self, field: HeaderField) -> Option<&HeaderValue> {
        self.fields.iter().find(|value| value.field == field)
    }
}

impl fmt::Display for HeaderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in &self.fields {
            writeln!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_from() {
        let value = extract_field(b"From: alice@example.com\r\n\r\n", HeaderField::From);
        assert_eq!(value.value.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_extract_unfolds() {
        let literal = b"Subject: a very long\r\n subject line\r\n\r\n";
        let value = extract_field(literal, HeaderField::Subject);
        assert_eq!(value.value.as_deref(), Some("a very long subject line"));
        assert_eq!(value.to_string(), "Subject: a very long subject line");
    }

    #[test]
    fn test_blank_subject_placeholder() {
        let value = extract_field(b"\r\n", HeaderField::Subject);
        assert_eq!(value.value, None);
        assert_eq!(value.to_string(), "Subject: <No subject>");
    }

    #[test]
    fn test_blank_to_placeholder() {
        let value = extract_field(b"\r\n", HeaderField::To);
        assert_eq!(value.to_string(), "To:");
        let value = extract_field(b"", HeaderField::Date);
        assert_eq!(value.to_string(), "Date:");
    }

    #[test]
    fn test_summary_display() {
        let summary = HeaderSummary {
            fields: vec![
                extract_field(b"From: a@b\r\n\r\n", HeaderField::From),
                extract_field(b"\r\n", HeaderField::To),
                extract_field(b"Date: Mon, 1 Jan 2024\r\n\r\n", HeaderField::Date),
                extract_field(b"Subject: Hi\r\n\r\n", HeaderField::Subject),
            ],
        };
        assert_eq!(
            summary.to_string(),
            "From: a@b\nTo:\nDate: Mon, 1 Jan 2024\nSubject: Hi\n"
        );
        assert_eq!(
            summary.get(HeaderField::Subject).unwrap().text(),
            "Hi"
        );
    }

    #[test]
    fn test_short_literal_yields_empty_value() {
        let value = extract_field(b"Sub\r\n", HeaderField::Subject);
        assert_eq!(value.value.as_deref(), Some(""));
    }

    proptest! {
        #[test]
        fn prop_span_length(len in 0usize..4096, index in 0usize..4) {
            let field = HeaderField::ALL[index];
            match field_span(len, field) {
                None => prop_assert!(len <= 2),
                Some(span) => {
                    prop_assert_eq!(span.end, len - 2);
                    if len >= field.label_len() + 2 {
                        prop_assert_eq!(span.len(), len - field.label_len() - 2);
                    } else {
                        prop_assert!(span.is_empty());
                    }
                }
            }
        }
    }
}
