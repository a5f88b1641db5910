//! Implementation for the not-authenticated state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::config::Config;
use crate::connection::framed::FramedStream;
use crate::connection::stream::{self, ImapStream};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::{Error, Result};

impl Client<ImapStream, NotAuthenticated> {
    /// Connects to the configured server and reads its greeting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] if no address accepts the connection, or a
    /// greeting error if the server turns the client away.
    pub async fn connect(config: &Config) -> Result<Self> {
        let stream = stream::connect(config).await?;
        tracing::info!(
            host = %config.host,
            port = config.port,
            tls = stream.is_tls(),
            "connected"
        );
        Self::from_framed(FramedStream::new(stream).with_io_timeout(config.io_timeout)).await
    }
}

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new client from a connected stream.
    ///
    /// Reads the server greeting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bye`] or [`Error::Greeting`] if the greeting is not
    /// an untagged `OK` or `PREAUTH`.
    pub async fn from_stream(stream: S) -> Result<Self> {
        Self::from_framed(FramedStream::new(stream)).await
    }

    async fn from_framed(mut framed: FramedStream<S>) -> Result<Self> {
        let greeting = framed.read_response().await?;

        match ResponseParser::parse(&greeting)? {
            Response::Untagged(
                UntaggedResponse::Ok { text } | UntaggedResponse::PreAuth { text },
            ) => tracing::debug!(greeting = %text, "server ready"),
            Response::Untagged(UntaggedResponse::Bye { text }) => return Err(Error::Bye(text)),
            _ => {
                return Err(Error::Greeting(
                    String::from_utf8_lossy(&greeting).trim_end().to_string(),
                ));
            }
        }

        Ok(Self {
            stream: framed,
            tag_gen: TagGenerator::default(),
            state: NotAuthenticated,
        })
    }

    /// Authenticates with the server using LOGIN.
    ///
    /// Consumes self and returns an authenticated client on success.
    ///
    /// # Errors
    ///
    /// A tagged `NO` or `BAD` becomes [`Error::Auth`].
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        let tag = self
            .send(&Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        let responses = self.read_until_tagged(&tag).await?;
        match Self::check_tagged_ok(&responses, &tag) {
            Ok(()) => {}
            Err(Error::No(text) | Error::Bad(text)) => return Err(Error::Auth(text)),
            Err(e) => return Err(e),
        }

        tracing::debug!(user = username, "logged in");
        Ok(self.transition(Authenticated))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_greeting_ok() {
        let mock = Builder::new().read(b"* OK IMAP4rev1 ready\r\n").build();
        let client = Client::from_stream(mock).await.unwrap();
        assert_eq!(client.commands_sent(), 0);
    }

    #[tokio::test]
    async fn test_greeting_bye() {
        let mock = Builder::new().read(b"* BYE too many connections\r\n").build();
        let err = Client::from_stream(mock).await.unwrap_err();
        assert!(matches!(err, Error::Bye(text) if text == "too many connections"));
    }

    #[tokio::test]
    async fn test_greeting_unexpected() {
        let mock = Builder::new().read(b"* NO go away\r\n").build();
        let err = Client::from_stream(mock).await.unwrap_err();
        assert!(matches!(err, Error::Greeting(_)));
    }

    #[tokio::test]
    async fn test_login() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A0001 LOGIN user \"p w\"\r\n")
            .read(b"A0001 OK LOGIN completed\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let client = client.login("user", "p w").await.unwrap();
        assert_eq!(client.commands_sent(), 1);
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A0001 LOGIN user wrong\r\n")
            .read(b"A0001 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let err = client.login("user", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }
}
