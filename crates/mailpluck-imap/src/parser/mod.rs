//! IMAP protocol parsers.
//!
//! Sans-I/O parsing of everything the client reads back from the server:
//!
//! - **Response**: classifies a single response line.
//! - **Literal**: finds the literal a single-section FETCH line announces.
//! - **Field**: pulls a header value out of a `HEADER.FIELDS` literal.
//! - **List**: walks a buffered multi-message subject FETCH response.
//!
//! # Example
//!
//! ```
//! use mailpluck_imap::parser::frame_literal;
//! use mailpluck_imap::types::Section;
//!
//! let chunk = b"* 1 FETCH (BODY[] {5}\r\nHello)\r\n";
//! let frame = frame_literal(chunk, Section::Full).unwrap();
//!
//! assert_eq!(&chunk[frame.offset..frame.end().unwrap()], b"Hello");
//! ```

pub mod field;
pub mod list;
pub mod literal;
pub mod response;

pub use field::{HeaderSummary, HeaderValue, extract_field, field_span};
pub use list::{MailboxEntry, MailboxListing, parse_subject_listing};
pub use literal::{LiteralFrame, frame_literal};
pub use response::{Response, ResponseParser, UntaggedResponse};
