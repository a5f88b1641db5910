//! Implementation for the selected state.
//!
//! Every retrieval here fetches one body section with `BODY.PEEK`, so the
//! `\Seen` flag is never set as a side effect.

use bytes::Bytes;
use mailpluck_mime::{MimeMessage, TextPart};
use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::Selected;
use crate::command::Command;
use crate::connection::framed::MAX_LITERAL_SIZE;
use crate::parser::{
    HeaderSummary, HeaderValue, MailboxListing, Response, ResponseParser, UntaggedResponse,
    extract_field, frame_literal, parse_subject_listing,
};
use crate::types::{HeaderField, Section, SeqNum, SequenceSet, Tag};
use crate::{Error, Result};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Returns the selected mailbox state.
    #[must_use]
    pub const fn selected(&self) -> &Selected {
        &self.state
    }

    /// Fetches a whole message exactly as the server stores it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the server sends no literal for the
    /// message.
    pub async fn fetch_raw(&mut self, seq: SeqNum) -> Result<Bytes> {
        self.fetch_literal(seq, Section::Full).await
    }

    /// Fetches one header field, unfolded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the server sends no literal for the
    /// field.
    pub async fn fetch_header_field(
        &mut self,
        seq: SeqNum,
        field: HeaderField,
    ) -> Result<HeaderValue> {
        let literal = self.fetch_literal(seq, field.into()).await?;
        Ok(extract_field(&literal, field))
    }

    /// Fetches `From`, `To`, `Date` and `Subject`, one command each.
    ///
    /// # Errors
    ///
    /// Stops at the first field that fails.
    pub async fn fetch_header_summary(&mut self, seq: SeqNum) -> Result<HeaderSummary> {
        let mut fields = Vec::with_capacity(HeaderField::ALL.len());
        for field in HeaderField::ALL {
            fields.push(self.fetch_header_field(seq, field).await?);
        }
        Ok(HeaderSummary { fields })
    }

    /// Fetches a message and extracts its plain-text alternative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing message and [`Error::Mime`]
    /// if the body is not a `multipart/alternative` with a UTF-8 plain-text
    /// part.
    pub async fn fetch_mime_text(&mut self, seq: SeqNum) -> Result<TextPart> {
        let raw = self.fetch_raw(seq).await?;
        let message = MimeMessage::parse(&raw)?;
        tracing::debug!(
            boundary = %message.boundary(),
            encoding = %message.text().encoding(),
            "plain-text part found"
        );
        Ok(message.into_text())
    }

    /// Lists the subject of every message in the mailbox.
    ///
    /// Nothing is sent when SELECT reported an empty mailbox.
    ///
    /// # Errors
    ///
    /// Fails if the server rejects the FETCH or the response is malformed.
    pub async fn list_subjects(&mut self) -> Result<MailboxListing> {
        if self.state.status.is_empty() {
            tracing::debug!(mailbox = %self.state.mailbox, "mailbox is empty, skipping FETCH");
            return Ok(MailboxListing::default());
        }

        let tag = self
            .send(&Command::Fetch {
                sequence: SequenceSet::ALL,
                section: HeaderField::Subject.into(),
            })
            .await?;

        let mut responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;
        responses.pop();

        let listing = parse_subject_listing(&responses.concat())?;
        tracing::debug!(messages = listing.len(), "listed subjects");
        Ok(listing)
    }

    /// Sends `FETCH <seq> BODY.PEEK[<section>]` and returns the literal.
    ///
    /// The first response line is framed before anything is consumed. On a
    /// match the line is discarded, exactly the announced number of bytes is
    /// read, and the rest of the response is drained up to the tagged line,
    /// which must be `OK`.
    async fn fetch_literal(&mut self, seq: SeqNum, section: Section) -> Result<Bytes> {
        let tag = self
            .send(&Command::Fetch {
                sequence: seq.into(),
                section,
            })
            .await?;

        let frame = loop {
            let line = self.stream.peek_line().await?;
            let framed = frame_literal(line, section);
            let unsolicited = framed.is_err() && is_unsolicited(line);
            match framed {
                Ok(frame) => break frame,
                Err(_) if unsolicited => {
                    self.stream.read_response().await?;
                }
                Err(err) => {
                    self.drain(&tag).await?;
                    return Err(err);
                }
            }
        };

        if frame.len > MAX_LITERAL_SIZE {
            return Err(Error::Protocol(format!(
                "literal too large: {} bytes (max {MAX_LITERAL_SIZE})",
                frame.len
            )));
        }

        self.stream.discard(frame.offset).await?;
        let literal = self.stream.read_exact(frame.len).await?;
        tracing::debug!(seq = frame.seq.get(), len = frame.len, "literal read");

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;
        Ok(literal)
    }

    /// Reads and drops the rest of a response without judging its status.
    async fn drain(&mut self, tag: &Tag) -> Result<()> {
        let responses = self.read_until_tagged(tag).await?;
        tracing::debug!(discarded = responses.len(), "response drained");
        Ok(())
    }
}

/// Untagged data the server may slip in before a FETCH response.
fn is_unsolicited(line: &[u8]) -> bool {
    matches!(
        ResponseParser::parse(line),
        Ok(Response::Untagged(untagged)) if !matches!(untagged, UntaggedResponse::Fetch { .. })
    )
}
