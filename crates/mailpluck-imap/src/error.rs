//! Error types for the IMAP library.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::types::{HeaderField, Section};

/// Errors that can occur during IMAP operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error during network operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake or encryption error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Invalid DNS name for TLS.
    #[error("Invalid DNS name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// No address of the server accepted a connection.
    #[error("Failed to connect to {host}:{port} using both IPv6 and IPv4")]
    Connect {
        /// Server hostname.
        host: String,
        /// Server port.
        port: u16,
    },

    /// The server greeting was not `OK` or `PREAUTH`.
    #[error("Server refused the connection: {0}")]
    Greeting(String),

    /// Protocol parsing error.
    #[error("Protocol error at position {position}: {message}")]
    Parse {
        /// Byte position where the error occurred.
        position: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// Authentication failed.
    #[error("Login failure: {0}")]
    Auth(String),

    /// Server returned NO response.
    #[error("Server returned NO: {0}")]
    No(String),

    /// Server returned BAD response.
    #[error("Server returned BAD: {0}")]
    Bad(String),

    /// Server greeted with BYE (disconnecting).
    #[error("Server sent BYE: {0}")]
    Bye(String),

    /// Operation timed out.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The requested message, field or folder does not exist.
    #[error("{0} not found")]
    NotFound(Missing),

    /// The message body is not the expected MIME structure.
    #[error("MIME structure error: {0}")]
    Mime(#[from] mailpluck_mime::Error),

    /// Protocol violation or unexpected data.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// What a [`Error::NotFound`] refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// No literal for the whole message.
    Message,
    /// No literal for a single header field.
    Field(HeaderField),
    /// SELECT was refused.
    Folder(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message => write!(f, "Message"),
            Self::Field(field) => write!(f, "{field} response"),
            Self::Folder(_) => write!(f, "Folder"),
        }
    }
}

impl From<Section> for Missing {
    fn from(section: Section) -> Self {
        match section {
            Section::Full => Self::Message,
            Section::HeaderField(field) => Self::Field(field),
        }
    }
}

/// Broad classes of [`Error`], used to pick a process outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The connection could not be established.
    Connect,
    /// Reading or writing an established connection failed.
    Transport,
    /// Login was refused.
    Auth,
    /// Message, field or folder absent.
    NotFound,
    /// MIME structure violation.
    Structural,
    /// The server misbehaved or refused a command.
    Protocol,
}

impl Error {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Connect { .. } | Self::InvalidDnsName(_) | Self::Greeting(_) | Self::Bye(_) => {
                ErrorKind::Connect
            }
            Self::Io(_) | Self::Tls(_) | Self::Timeout(_) => ErrorKind::Transport,
            Self::Auth(_) => ErrorKind::Auth,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Mime(_) => ErrorKind::Structural,
            Self::Parse { .. } | Self::No(_) | Self::Bad(_) | Self::Protocol(_) => {
                ErrorKind::Protocol
            }
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
