//! Type-state IMAP client connection.
//!
//! Uses the type-state pattern to enforce valid state transitions at compile time.
//! The IMAP connection states are:
//!
//! - `NotAuthenticated`: Initial state after connection
//! - `Authenticated`: After successful LOGIN
//! - `Selected`: After successful SELECT
//!
//! Each state only exposes methods that are valid for that state. Commands
//! are strictly sequential: every method sends one command and reads its
//! response through to the tagged completion line before returning.

mod authenticated;
mod not_authenticated;
mod selected;
mod states;

use tokio::io::{AsyncRead, AsyncWrite};

pub use self::states::{Authenticated, NotAuthenticated, Selected};
use super::framed::{FramedStream, ResponseAccumulator};
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser};
use crate::types::{Status, Tag};
use crate::{Error, Result};

/// IMAP client connection with type-state.
///
/// The type parameter `State` tracks the connection state at compile time.
pub struct Client<S, State> {
    pub(crate) stream: FramedStream<S>,
    pub(crate) tag_gen: TagGenerator,
    pub(crate) state: State,
}

// Manual Debug implementation since FramedStream doesn't implement Debug
impl<S, State: std::fmt::Debug> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Shared implementation for all states.
impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Moves the connection into another state.
    pub(crate) fn transition<Next>(self, state: Next) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            state,
        }
    }

    /// Tags and sends a command, returning the tag used.
    pub(crate) async fn send(&mut self, command: &Command) -> Result<Tag> {
        let tag = self.tag_gen.next_tag();
        tracing::debug!(command = %command.redacted(tag.as_str()), "C:");
        self.stream
            .write_command(&command.serialize(tag.as_str()))
            .await?;
        Ok(tag)
    }

    /// Reads responses until we get a tagged response matching our tag.
    pub(crate) async fn read_until_tagged(&mut self, tag: &Tag) -> Result<Vec<Vec<u8>>> {
        let mut accumulator = ResponseAccumulator::new(tag.clone());
        accumulator.read_until_tagged(&mut self.stream).await
    }

    /// Checks that the tagged response is OK.
    pub(crate) fn check_tagged_ok(responses: &[Vec<u8>], tag: &Tag) -> Result<()> {
        // Find the tagged response (should be the last one)
        for response_bytes in responses.iter().rev() {
            if let Ok(Response::Tagged {
                tag: resp_tag,
                status,
                text,
            }) = ResponseParser::parse(response_bytes)
                && resp_tag == *tag
            {
                return match status {
                    Status::Ok | Status::PreAuth => Ok(()),
                    Status::No => Err(Error::No(text)),
                    Status::Bad => Err(Error::Bad(text)),
                    Status::Bye => Err(Error::Bye(text)),
                };
            }
        }

        Err(Error::Protocol("missing tagged response".to_string()))
    }

    /// Gracefully disconnects from the server.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be written or the server rejects it.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.send(&Command::Logout).await?;
        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)
    }

    /// Returns the number of commands sent so far.
    #[must_use]
    pub const fn commands_sent(&self) -> u32 {
        self.tag_gen.issued()
    }

    /// Consumes the client and returns the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    fn client(mock: tokio_test::io::Mock) -> Client<tokio_test::io::Mock, NotAuthenticated> {
        Client {
            stream: FramedStream::new(mock),
            tag_gen: TagGenerator::default(),
            state: NotAuthenticated,
        }
    }

    #[test]
    fn test_check_tagged_ok() {
        let tag = Tag::new("A0001");
        let ok = vec![b"* 1 EXISTS\r\n".to_vec(), b"A0001 OK done\r\n".to_vec()];
        assert!(Client::<tokio_test::io::Mock, NotAuthenticated>::check_tagged_ok(&ok, &tag).is_ok());

        let no = vec![b"A0001 NO nope\r\n".to_vec()];
        assert!(matches!(
            Client::<tokio_test::io::Mock, NotAuthenticated>::check_tagged_ok(&no, &tag),
            Err(Error::No(text)) if text == "nope"
        ));

        let bad = vec![b"A0001 BAD syntax\r\n".to_vec()];
        assert!(matches!(
            Client::<tokio_test::io::Mock, NotAuthenticated>::check_tagged_ok(&bad, &tag),
            Err(Error::Bad(_))
        ));

        let other = vec![b"A0002 OK done\r\n".to_vec()];
        assert!(matches!(
            Client::<tokio_test::io::Mock, NotAuthenticated>::check_tagged_ok(&other, &tag),
            Err(Error::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn test_logout() {
        let mock = Builder::new()
            .write(b"A0001 LOGOUT\r\n")
            .read(b"* BYE logging out\r\nA0001 OK LOGOUT completed\r\n")
            .build();

        client(mock).logout().await.unwrap();
    }
}
