//! Implementation for the authenticated state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, Selected};
use crate::command::Command;
use crate::error::Missing;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Mailbox, MailboxStatus};
use crate::{Error, Result};

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Selects a mailbox.
    ///
    /// Consumes self and returns a selected client on success.
    ///
    /// # Errors
    ///
    /// A tagged `NO` or `BAD` becomes [`Error::NotFound`] for the folder.
    pub async fn select(mut self, mailbox: Mailbox) -> Result<Client<S, Selected>> {
        let tag = self
            .send(&Command::Select {
                mailbox: mailbox.clone(),
            })
            .await?;

        let responses = self.read_until_tagged(&tag).await?;
        match Self::check_tagged_ok(&responses, &tag) {
            Ok(()) => {}
            Err(Error::No(text) | Error::Bad(text)) => {
                tracing::debug!(%mailbox, reason = %text, "SELECT refused");
                return Err(Error::NotFound(Missing::Folder(mailbox.0)));
            }
            Err(e) => return Err(e),
        }

        let status = parse_mailbox_status(&responses);
        tracing::debug!(%mailbox, exists = status.exists, "selected");
        Ok(self.transition(Selected::new(mailbox, status)))
    }
}

/// Collects mailbox status from untagged SELECT data.
///
/// The last `EXISTS` wins.
fn parse_mailbox_status(responses: &[Vec<u8>]) -> MailboxStatus {
    let mut status = MailboxStatus::default();
    for response_bytes in responses {
        if let Ok(Response::Untagged(UntaggedResponse::Exists(n))) =
            ResponseParser::parse(response_bytes)
        {
            status.exists = n;
        }
    }
    status
}
