//! Rendering results and failures.

use std::io::{self, Write};

use mailpluck_imap::{Error, ErrorKind, HeaderSummary, MailboxListing, Missing};
use mailpluck_mime::TextPart;

/// What an operation produced, ready to print.
#[derive(Debug)]
pub enum Output {
    /// A whole message, byte for byte.
    Raw(Vec<u8>),
    /// The four summary header fields.
    Summary(HeaderSummary),
    /// A plain-text body.
    Text(Vec<u8>),
    /// One line per message.
    Listing(MailboxListing),
}

impl Output {
    /// Body of a plain-text part, quoted-printable decoded when asked for.
    pub fn text(part: TextPart, decode: bool) -> mailpluck_imap::Result<Self> {
        let body = if decode {
            part.decoded()?
        } else {
            part.into_body()
        };
        Ok(Self::Text(body))
    }

    /// Prints the result on `out`. An empty listing is not a result and is
    /// only noted on `diag`.
    pub fn write_to(&self, out: &mut impl Write, diag: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Raw(message) => out.write_all(message)?,
            Self::Summary(summary) => write!(out, "{summary}")?,
            Self::Text(body) => {
                out.write_all(body)?;
                if !body.ends_with(b"\n") {
                    out.write_all(b"\n")?;
                }
            }
            Self::Listing(listing) if listing.is_empty() => {
                writeln!(diag, "Mailbox is empty")?;
            }
            Self::Listing(listing) => write!(out, "{listing}")?,
        }
        out.flush()
    }
}

fn kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.downcast_ref::<Error>().map(Error::kind)
}

/// Process exit status for a failed run.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match kind(err) {
        Some(ErrorKind::Connect) => 2,
        Some(ErrorKind::NotFound | ErrorKind::Auth) => 3,
        Some(ErrorKind::Structural) => 4,
        Some(ErrorKind::Transport | ErrorKind::Protocol) | None => 1,
    }
}

/// Tells the user what went wrong.
///
/// A missing message or folder and a rejected login are answers and go to
/// `out`. A missing header field is reported bare on `diag`, and everything
/// else is prefixed with `Error:` there.
pub fn report(
    err: &anyhow::Error,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> io::Result<()> {
    match err.downcast_ref::<Error>() {
        Some(
            answer @ (Error::NotFound(Missing::Message | Missing::Folder(_)) | Error::Auth(_)),
        ) => writeln!(out, "{answer}"),
        Some(missing @ Error::NotFound(Missing::Field(_))) => writeln!(diag, "{missing}"),
        _ => writeln!(diag, "Error: {err:#}"),
    }
}
