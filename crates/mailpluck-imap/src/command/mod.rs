//! IMAP command builder.
//!
//! This module provides types and serialization for the commands the client
//! sends: `LOGIN`, `SELECT`, `FETCH` and `LOGOUT`.

mod serialize;
mod tag_generator;

use crate::types::{Mailbox, Section, SequenceSet};

pub use tag_generator::TagGenerator;

use serialize::{write_astring, write_mailbox, write_section};

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// SELECT command.
    Select {
        /// Mailbox to select.
        mailbox: Mailbox,
    },
    /// FETCH of a single body section, always with `BODY.PEEK` so the
    /// `\Seen` flag is left alone.
    Fetch {
        /// Messages to fetch.
        sequence: SequenceSet,
        /// Section to fetch.
        section: Section,
    },
    /// LOGOUT command.
    Logout,
}

impl Command {
    /// Serializes the command to bytes with the given tag.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');

        match self {
            Self::Login { username, password } => {
                buf.extend_from_slice(b"LOGIN ");
                write_astring(&mut buf, username);
                buf.push(b' ');
                write_astring(&mut buf, password);
            }
            Self::Select { mailbox } => {
                buf.extend_from_slice(b"SELECT ");
                write_mailbox(&mut buf, mailbox);
            }
            Self::Fetch { sequence, section } => {
                buf.extend_from_slice(b"FETCH ");
                buf.extend_from_slice(sequence.to_string().as_bytes());
                buf.push(b' ');
                write_section(&mut buf, *section);
            }
            Self::Logout => buf.extend_from_slice(b"LOGOUT"),
        }
        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns a loggable form of the command with credentials masked.
    #[must_use]
    pub fn redacted(&self, tag: &str) -> String {
        match self {
            Self::Login { username, .. } => format!("{tag} LOGIN {username} ****"),
            _ => String::from_utf8_lossy(&self.serialize(tag))
                .trim_end()
                .to_string(),
        }
    }
}
