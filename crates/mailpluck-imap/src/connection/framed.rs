//! Transport reader.
//!
//! Responses arrive as CRLF-terminated lines, some of them followed by a
//! `{N}` literal. The read buffer here can be inspected without consuming it,
//! so a caller can look at the first line of a response before deciding what
//! to do with the rest.

use std::future::Future;
use std::io;
use std::time::Duration;

use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::types::Tag;
use crate::{Error, Result};

const READ_CHUNK: usize = 8192;

/// Longest response line accepted before the peer is considered broken.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Largest literal the client will buffer.
pub const MAX_LITERAL_SIZE: usize = 100 * 1024 * 1024; // 100 MB

/// A byte stream with a peekable read buffer and an optional deadline on
/// every read and write.
pub struct FramedStream<S> {
    stream: S,
    read_buffer: BytesMut,
    write_buffer: BytesMut,
    io_timeout: Option<Duration>,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new framed stream without an I/O timeout.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            read_buffer: BytesMut::with_capacity(READ_CHUNK),
            write_buffer: BytesMut::with_capacity(READ_CHUNK),
            io_timeout: None,
        }
    }

    /// Bounds every subsequent read and write.
    #[must_use]
    pub const fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Reads more data from the stream into the buffer.
    async fn fill(&mut self) -> Result<()> {
        self.read_buffer.reserve(READ_CHUNK);
        let n = with_timeout(
            self.io_timeout,
            self.stream.read_buf(&mut self.read_buffer),
        )
        .await?;
        if n == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed",
            )));
        }
        Ok(())
    }

    /// Returns the next CRLF-terminated line without consuming it.
    ///
    /// # Errors
    ///
    /// Fails if the connection closes before a full line arrives or the line
    /// exceeds the maximum length.
    pub async fn peek_line(&mut self) -> Result<&[u8]> {
        loop {
            if let Some(pos) = find_crlf(&self.read_buffer) {
                return Ok(&self.read_buffer[..pos + 2]);
            }
            if self.read_buffer.len() > MAX_LINE_LENGTH {
                return Err(Error::Protocol("line too long".to_string()));
            }
            self.fill().await?;
        }
    }

    /// Reads exactly `n` bytes, looping over short reads.
    ///
    /// # Errors
    ///
    /// Fails if the connection closes or errors first.
    pub async fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        while self.read_buffer.len() < n {
            self.fill().await?;
        }
        Ok(self.read_buffer.split_to(n).freeze())
    }

    /// Reads and drops exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// Fails if the connection closes or errors first.
    pub async fn discard(&mut self, n: usize) -> Result<()> {
        while self.read_buffer.len() < n {
            self.fill().await?;
        }
        self.read_buffer.advance(n);
        Ok(())
    }

    /// Reads a single CRLF-terminated line.
    ///
    /// # Errors
    ///
    /// Same as [`peek_line`](Self::peek_line).
    pub async fn read_line(&mut self) -> Result<Bytes> {
        let len = self.peek_line().await?.len();
        let line = self.read_buffer.split_to(len).freeze();
        tracing::trace!(line = %String::from_utf8_lossy(&line).trim_end(), "S:");
        Ok(line)
    }

    /// Reads one whole response: its line plus every literal the line
    /// announces, and the continuation lines after each literal.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, overlong lines and literals above
    /// [`MAX_LITERAL_SIZE`].
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();

        loop {
            let line = self.read_line().await?;
            response.extend_from_slice(&line);

            let Some(literal_len) = parse_literal_length(&line) else {
                break;
            };
            if literal_len > MAX_LITERAL_SIZE {
                return Err(Error::Protocol(format!(
                    "literal too large: {literal_len} bytes (max {MAX_LITERAL_SIZE})"
                )));
            }
            let literal = self.read_exact(literal_len).await?;
            response.extend_from_slice(&literal);
        }

        Ok(response)
    }

    /// Writes one complete command line and flushes it.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or when the write times out.
    pub async fn write_command(&mut self, data: &[u8]) -> Result<()> {
        self.write_buffer.clear();
        self.write_buffer.extend_from_slice(data);

        let stream = &mut self.stream;
        let buf = &self.write_buffer;
        with_timeout(self.io_timeout, async move {
            stream.write_all(buf).await?;
            stream.flush().await
        })
        .await
    }

    /// Returns the inner stream, dropping anything still buffered.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

async fn with_timeout<T>(
    limit: Option<Duration>,
    io: impl Future<Output = io::Result<T>>,
) -> Result<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, io)
            .await
            .map_err(|_| Error::Timeout(limit))?
            .map_err(Error::from),
        None => io.await.map_err(Error::from),
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Length announced by a trailing `{N}` or `{N+}` on a complete line.
fn parse_literal_length(line: &[u8]) -> Option<usize> {
    let line = line.strip_suffix(b"\r\n")?;
    let open = line.iter().rposition(|&b| b == b'{')?;
    let inner = line[open + 1..].strip_suffix(b"}")?;
    let digits = inner.strip_suffix(b"+").unwrap_or(inner);

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Collects the responses to one command.
pub struct ResponseAccumulator {
    tag: Tag,
    responses: Vec<Vec<u8>>,
}

impl ResponseAccumulator {
    /// Collects responses for the command tagged `tag`.
    #[must_use]
    pub const fn new(tag: Tag) -> Self {
        Self {
            tag,
            responses: Vec::new(),
        }
    }

    /// Reads responses up to and including the one carrying our tag.
    ///
    /// The tagged line is the last element of the returned vector.
    ///
    /// # Errors
    ///
    /// Propagates any read error.
    pub async fn read_until_tagged<S>(
        &mut self,
        framed: &mut FramedStream<S>,
    ) -> Result<Vec<Vec<u8>>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            let response = framed.read_response().await?;
            let is_tagged = is_tagged_for(&response, &self.tag);
            self.responses.push(response);

            if is_tagged {
                break;
            }
        }

        Ok(std::mem::take(&mut self.responses))
    }
}

/// Returns true if `line` starts with `tag` followed by a space.
pub fn is_tagged_for(line: &[u8], tag: &Tag) -> bool {
    let tag = tag.as_str().as_bytes();
    line.strip_prefix(tag)
        .is_some_and(|rest| rest.first() == Some(&b' '))
}
