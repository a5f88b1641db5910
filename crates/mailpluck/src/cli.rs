//! Command-line arguments.

use std::num::NonZeroU32;
use std::time::Duration;

use clap::{ArgEnum, Parser};
use mailpluck_imap::{Config, Mailbox, Security, SeqNum};

/// Fetch messages, header summaries, plain-text parts and subject listings
/// from an IMAP mailbox.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Login name
    #[clap(short, long)]
    pub user: String,

    /// Login password
    #[clap(short, long, env = "MAILPLUCK_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Mailbox to select
    #[clap(short, long, default_value = "INBOX")]
    pub folder: String,

    /// Sequence number of the message to fetch
    #[clap(short = 'n', long = "number", default_value = "1")]
    pub number: NonZeroU32,

    /// Connect with implicit TLS (port 993)
    #[clap(short = 't', long)]
    pub tls: bool,

    /// Override the default port
    #[clap(long)]
    pub port: Option<u16>,

    /// Give up on a read or write after this many seconds
    #[clap(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Undo quoted-printable encoding in `mime` output
    #[clap(long)]
    pub decode: bool,

    /// What to fetch
    #[clap(arg_enum)]
    pub command: Operation,

    /// IMAP server host name
    pub server: String,
}

/// The four things mailpluck can do with a mailbox.
#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Print the whole message as stored on the server
    Retrieve,
    /// Print the From, To, Date and Subject fields
    Parse,
    /// Print the plain-text part of a multipart/alternative message
    Mime,
    /// Print the subject of every message in the folder
    List,
}

impl Args {
    /// Connection settings for the chosen server.
    pub fn config(&self) -> Config {
        let security = if self.tls {
            Security::Implicit
        } else {
            Security::None
        };

        let mut builder = Config::builder(&self.server).security(security);
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(secs) = self.timeout {
            builder = builder.io_timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// The folder to select.
    pub fn mailbox(&self) -> Mailbox {
        Mailbox::new(&self.folder)
    }

    /// The message to fetch.
    pub fn seq(&self) -> SeqNum {
        self.number.into()
    }
}
