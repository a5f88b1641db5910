//! Integration tests for the IMAP client.
//!
//! These tests use a mock stream to simulate IMAP server responses
//! without requiring a real server connection.

use std::io::{self, Cursor};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use mailpluck_imap::{
    Client, Error, ErrorKind, HeaderField, Mailbox, Missing, NotAuthenticated, SeqNum,
};

/// Mock stream that returns predefined responses.
struct MockStream {
    /// Responses to return (in order).
    responses: Cursor<Vec<u8>>,
    /// Largest chunk handed out per read.
    chunk: usize,
    /// Captured commands sent by the client.
    sent: Vec<u8>,
}

impl MockStream {
    fn new(responses: &[u8]) -> Self {
        Self::chunked(responses, usize::MAX)
    }

    /// Delivers at most `chunk` bytes per read.
    fn chunked(responses: &[u8], chunk: usize) -> Self {
        Self {
            responses: Cursor::new(responses.to_vec()),
            chunk,
            sent: Vec::new(),
        }
    }

    fn sent_data(&self) -> String {
        String::from_utf8_lossy(&self.sent).into_owned()
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let pos = usize::try_from(self.responses.position()).unwrap();
        let data = self.responses.get_ref();

        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let remaining = &data[pos..];
        let to_read = remaining.len().min(buf.remaining()).min(self.chunk);
        buf.put_slice(&remaining[..to_read]);
        self.responses.set_position((pos + to_read) as u64);

        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.sent.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

const PREAMBLE: &[u8] = b"* OK [CAPABILITY IMAP4rev1] Dovecot ready.\r\n\
    A0001 OK Logged in\r\n\
    * FLAGS (\\Answered \\Seen)\r\n\
    * 2 EXISTS\r\n\
    * 0 RECENT\r\n\
    A0002 OK [READ-WRITE] Select completed\r\n";

fn with_preamble(rest: &[u8]) -> Vec<u8> {
    let mut data = PREAMBLE.to_vec();
    data.extend_from_slice(rest);
    data
}

fn literal_response(seq: u32, section: &str, literal: &[u8], tag: &str) -> Vec<u8> {
    let mut out = format!("* {seq} FETCH (BODY[{section}] {{{}}}\r\n", literal.len()).into_bytes();
    out.extend_from_slice(literal);
    out.extend_from_slice(format!(")\r\n{tag} OK Fetch completed\r\n").as_bytes());
    out
}

async fn selected(stream: MockStream) -> Client<MockStream, mailpluck_imap::Selected> {
    Client::<_, NotAuthenticated>::from_stream(stream)
        .await
        .unwrap()
        .login("user@example.com", "secret")
        .await
        .unwrap()
        .select(Mailbox::inbox())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_retrieve_session() {
    let message = b"From: a@example.com\r\nSubject: Hi\r\n\r\nBody\r\n";
    let data = with_preamble(&literal_response(1, "", message, "A0003"));

    let mut client = selected(MockStream::new(&data)).await;
    assert_eq!(client.selected().exists(), 2);

    let raw = client.fetch_raw(SeqNum::FIRST).await.unwrap();
    assert_eq!(&raw[..], message);

    let sent = client.into_inner().sent_data();
    assert_eq!(
        sent,
        "A0001 LOGIN user@example.com secret\r\n\
         A0002 SELECT INBOX\r\n\
         A0003 FETCH 1 BODY.PEEK[]\r\n"
    );
}

#[tokio::test]
async fn test_retrieve_one_byte_reads() {
    let message = b"Hello";
    let data = with_preamble(&literal_response(2, "", message, "A0003"));

    let mut client = selected(MockStream::chunked(&data, 1)).await;
    let raw = client.fetch_raw(SeqNum::new(2).unwrap()).await.unwrap();
    assert_eq!(&raw[..], b"Hello");
}

#[tokio::test]
async fn test_parse_session() {
    let mut rest = Vec::new();
    rest.extend(literal_response(
        1,
        "HEADER.FIELDS (FROM)",
        b"From: Alice <alice@example.com>\r\n\r\n",
        "A0003",
    ));
    rest.extend(literal_response(1, "HEADER.FIELDS (TO)", b"\r\n", "A0004"));
    rest.extend(literal_response(
        1,
        "HEADER.FIELDS (DATE)",
        b"Date: Tue, 2 Apr 2024 10:00:00 +0000\r\n\r\n",
        "A0005",
    ));
    rest.extend(literal_response(
        1,
        "HEADER.FIELDS (SUBJECT)",
        b"Subject: quarterly\r\n report\r\n\r\n",
        "A0006",
    ));
    let data = with_preamble(&rest);

    let mut client = selected(MockStream::new(&data)).await;
    let summary = client.fetch_header_summary(SeqNum::FIRST).await.unwrap();

    assert_eq!(
        summary.to_string(),
        "From: Alice <alice@example.com>\n\
         To:\n\
         Date: Tue, 2 Apr 2024 10:00:00 +0000\n\
         Subject: quarterly report\n"
    );
    assert_eq!(client.commands_sent(), 6);
}

#[tokio::test]
async fn test_blank_subject() {
    let data = with_preamble(&literal_response(
        1,
        "HEADER.FIELDS (SUBJECT)",
        b"\r\n",
        "A0003",
    ));

    let mut client = selected(MockStream::new(&data)).await;
    let subject = client
        .fetch_header_field(SeqNum::FIRST, HeaderField::Subject)
        .await
        .unwrap();
    assert_eq!(subject.to_string(), "Subject: <No subject>");
}

#[tokio::test]
async fn test_mime_session() {
    let body = b"MIME-Version: 1.0\r\n\
        Content-Type: multipart/alternative;\r\n boundary=\"=_alt\"\r\n\r\n\
        --=_alt\r\n\
        Content-Transfer-Encoding: quoted-printable\r\n\
        Content-Type: text/plain; charset=\"UTF-8\"\r\n\r\n\
        Caf=C3=A9 au lait\r\n\
        --=_alt\r\n\
        Content-Type: text/html; charset=UTF-8\r\n\r\n\
        <p>Caf&eacute;</p>\r\n\
        --=_alt--\r\n";
    let data = with_preamble(&literal_response(1, "", body, "A0003"));

    let mut client = selected(MockStream::new(&data)).await;
    let text = client.fetch_mime_text(SeqNum::FIRST).await.unwrap();
    assert_eq!(text.body(), b"Caf=C3=A9 au lait");
    assert_eq!(text.decoded().unwrap(), "Café au lait".as_bytes());
}

#[tokio::test]
async fn test_mime_structure_error() {
    let body = b"MIME-Version: 1.0\r\nContent-Type: text/plain\r\n\r\nplain\r\n";
    let data = with_preamble(&literal_response(1, "", body, "A0003"));

    let mut client = selected(MockStream::new(&data)).await;
    let err = client.fetch_mime_text(SeqNum::FIRST).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[tokio::test]
async fn test_list_session() {
    let data = with_preamble(
        b"* 1 FETCH (BODY[HEADER.FIELDS (SUBJECT)] {39}\r\n\
          Subject: a very long\r\n subject line\r\n\r\n)\r\n\
          * 2 FETCH (BODY[HEADER.FIELDS (SUBJECT)] {2}\r\n\r\n)\r\n\
          A0003 OK Fetch completed\r\n",
    );

    let mut client = selected(MockStream::new(&data)).await;
    let listing = client.list_subjects().await.unwrap();
    let lines: Vec<String> = listing.iter().map(ToString::to_string).collect();
    assert_eq!(lines, ["1: a very long subject line", "2: <No subject>"]);

    let sent = client.into_inner().sent_data();
    assert!(sent.ends_with("A0003 FETCH 1:* BODY.PEEK[HEADER.FIELDS (SUBJECT)]\r\n"));
}

#[tokio::test]
async fn test_message_not_found() {
    let data = with_preamble(b"A0003 OK Fetch completed\r\n");

    let mut client = selected(MockStream::new(&data)).await;
    let err = client.fetch_raw(SeqNum::new(42).unwrap()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(Missing::Message)));
    assert_eq!(err.to_string(), "Message not found");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_connection_closed_mid_literal() {
    let data = with_preamble(b"* 1 FETCH (BODY[] {100}\r\nonly a little");

    let mut client = selected(MockStream::new(&data)).await;
    let err = client.fetch_raw(SeqNum::FIRST).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_login_failure() {
    let data = b"* OK ready\r\nA0001 NO [AUTHENTICATIONFAILED] Authentication failed.\r\n";

    let client = Client::from_stream(MockStream::new(data)).await.unwrap();
    let err = client.login("user", "bad").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}
