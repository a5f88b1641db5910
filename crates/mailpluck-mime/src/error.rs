//! Error types for MIME operations.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
///
/// The structural variants map one-to-one onto the stages of
/// [`MimeMessage::parse`](crate::MimeMessage::parse); the first stage that
/// fails decides the variant and no partial text is produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No `MIME-Version: 1.0` marker.
    #[error("MIME-Version not found")]
    MimeVersionMissing,

    /// No `Content-Type: multipart/alternative;` header.
    #[error("Content-Type: multipart/alternative not found")]
    NotMultipartAlternative,

    /// No usable `boundary=` parameter.
    #[error("Boundary not found")]
    BoundaryMissing,

    /// No opening `--boundary` delimiter line.
    #[error("Starting boundary not found")]
    StartBoundaryMissing,

    /// No `Content-Type: text/plain` part with a UTF-8 charset.
    #[error("Content-Type text/plain with charset=UTF-8 not found")]
    PlainTextPartMissing,

    /// No accepted `Content-Transfer-Encoding` header.
    #[error("Content-Transfer-Encoding not found")]
    EncodingMissing,

    /// No delimiter after the plain-text body.
    #[error("Ending boundary not found")]
    EndBoundaryMissing,

    /// Malformed quoted-printable escape.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}
