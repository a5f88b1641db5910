//! Multipart boundary parameter handling.

use std::fmt;

use crate::error::{Error, Result};
use crate::search::find;

/// Longest boundary token RFC 2046 allows.
pub const MAX_BOUNDARY_LEN: usize = 70;

const BOUNDARY_PARAM: &[u8] = b"boundary=";

/// A multipart boundary token, without the leading `--`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(Vec<u8>);

impl Boundary {
    /// Creates a boundary from a token, checking the 1 to 70 byte length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryMissing`] for an empty or overlong token.
    pub fn new(token: impl Into<Vec<u8>>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() || token.len() > MAX_BOUNDARY_LEN {
            return Err(Error::BoundaryMissing);
        }
        Ok(Self(token))
    }

    /// Extracts the boundary from the first `boundary=` parameter in `params`.
    ///
    /// The value is either a double-quoted token, ended by the next `"`, or a
    /// bare token ended by a space, CR, LF or the end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryMissing`] if there is no parameter, the quote
    /// is never closed, or the token length is out of range.
    pub fn extract(params: &[u8]) -> Result<Self> {
        let param = find(params, BOUNDARY_PARAM).ok_or(Error::BoundaryMissing)?;
        let value = &params[param + BOUNDARY_PARAM.len()..];

        let token = if let Some(quoted) = value.strip_prefix(b"\"") {
            let end = quoted
                .iter()
                .position(|&b| b == b'"')
                .ok_or(Error::BoundaryMissing)?;
            &quoted[..end]
        } else {
            let end = value
                .iter()
                .position(|&b| matches!(b, b' ' | b'\r' | b'\n'))
                .unwrap_or(value.len());
            &value[..end]
        };

        Self::new(token)
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Delimiter line that opens the first body part: `\r\n--{boundary}\r\n`.
    #[must_use]
    pub fn opening_delimiter(&self) -> Vec<u8> {
        let mut delimiter = self.delimiter();
        delimiter.extend_from_slice(b"\r\n");
        delimiter
    }

    /// Delimiter that ends a body part: `\r\n--{boundary}`.
    ///
    /// Also matches the start of the closing `--{boundary}--` line.
    #[must_use]
    pub fn delimiter(&self) -> Vec<u8> {
        let mut delimiter = Vec::with_capacity(self.0.len() + 4);
        delimiter.extend_from_slice(b"\r\n--");
        delimiter.extend_from_slice(&self.0);
        delimiter
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
