//! Core IMAP types.
//!
//! This module defines the small set of protocol types the client needs,
//! following RFC 3501 (`IMAP4rev1`).

mod identifiers;
mod mailbox;
mod section;
mod sequence;
mod status;

pub use identifiers::{SeqNum, Tag};
pub use mailbox::{Mailbox, MailboxStatus};
pub use section::{HeaderField, Section};
pub use sequence::SequenceSet;
pub use status::Status;
