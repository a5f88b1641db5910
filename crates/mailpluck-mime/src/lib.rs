//! # mailpluck-mime
//!
//! Structural scanning of raw RFC 2822 / MIME messages.
//!
//! This crate does not build a full MIME tree. It locates just enough
//! structure to pull the plain-text alternative out of a
//! `multipart/alternative` message, and offers the header helpers the IMAP
//! side needs for single-field literals.
//!
//! ## Features
//!
//! - **Case-insensitive search**: one byte-slice search used by every header
//!   and delimiter lookup ([`find`])
//! - **Header unfolding**: CRLF removal for folded field values ([`unfold`])
//! - **Boundary extraction**: quoted and bare `boundary=` parameters
//! - **Plain-text selection**: the first `text/plain; charset=UTF-8` part of a
//!   `multipart/alternative` body
//! - **Quoted-printable decoding**: opt-in, never applied implicitly
//!
//! ## Quick Start
//!
//! ```
//! use mailpluck_mime::MimeMessage;
//!
//! let raw = b"MIME-Version: 1.0\r\n\
//! Content-Type: multipart/alternative; boundary=\"X\"\r\n\
//! \r\n\
//! --X\r\n\
//! Content-Type: text/plain; charset=UTF-8\r\n\
//! Content-Transfer-Encoding: 7bit\r\n\
//! \r\n\
//! Hello\r\n\
//! --X--\r\n";
//!
//! let message = MimeMessage::parse(raw)?;
//! assert_eq!(message.text().body(), b"Hello");
//! # Ok::<(), mailpluck_mime::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;
mod search;

pub mod encoding;

pub use content_type::{Boundary, MAX_BOUNDARY_LEN};
pub use encoding::TransferEncoding;
pub use error::{Error, Result};
pub use header::{strip_leading_whitespace, unfold};
pub use message::{MimeMessage, TextPart};
pub use search::{find, find_from};
