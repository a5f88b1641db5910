//! # mailpluck-imap
//!
//! A small IMAP4rev1 (RFC 3501) client for pulling single messages, header
//! fields and subject listings out of a mailbox.
//!
//! ## Features
//!
//! - **Type-state connection management**: Compile-time enforcement of valid
//!   IMAP state transitions (`NotAuthenticated` → `Authenticated` → `Selected`)
//! - **Literal framing**: the first line of a FETCH response is inspected
//!   without consuming it, then exactly the announced number of bytes is read
//! - **Header field extraction** with unfolding and placeholders for blank
//!   fields
//! - **MIME text extraction** through [`mailpluck_mime`]
//! - **TLS via rustls**: Secure connections without OpenSSL dependency
//! - **Sans-I/O parsers**: Protocol parsing separated from network I/O
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailpluck_imap::{Client, Config, HeaderField, Mailbox, Security, SeqNum};
//!
//! #[tokio::main]
//! async fn main() -> mailpluck_imap::Result<()> {
//!     let config = Config::builder("imap.example.com")
//!         .security(Security::Implicit)
//!         .build();
//!     let client = Client::connect(&config).await?;
//!     let client = client.login("user@example.com", "password").await?;
//!     let mut client = client.select(Mailbox::inbox()).await?;
//!
//!     let first = SeqNum::FIRST;
//!     let subject = client.fetch_header_field(first, HeaderField::Subject).await?;
//!     println!("{subject}");
//!
//!     for entry in &client.list_subjects().await? {
//!         println!("{entry}");
//!     }
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! ┌─────────────────────┐
//! │   NotAuthenticated  │ ─── login() ───→ Authenticated
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    Authenticated    │ ─── select() ───→ Selected
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │      Selected       │ ─── fetch_*() / list_subjects()
//! └─────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`command`]: IMAP command builders and tag generation
//! - [`connection`]: Connection management and type-state client
//! - [`parser`]: Response, literal, field and listing parsers
//! - [`types`]: Core IMAP types (tags, sequence numbers, sections, etc.)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, ConfigBuilder, FramedStream, ImapStream, NotAuthenticated,
    ResponseAccumulator, Security, Selected,
};
pub use error::{Error, ErrorKind, Missing, Result};
pub use parser::{
    HeaderSummary, HeaderValue, LiteralFrame, MailboxEntry, MailboxListing, Response,
    ResponseParser, UntaggedResponse,
};
pub use types::{HeaderField, Mailbox, MailboxStatus, Section, SeqNum, SequenceSet, Status, Tag};
