//! IMAP response line parser.
//!
//! Classifies a single response line. Literal payloads are never passed
//! here; the framed stream and the literal framer deal with those.

use crate::types::{SeqNum, Status, Tag};
use crate::{Error, Result};

/// A parsed IMAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Tagged response (command completion).
    Tagged {
        /// The command tag.
        tag: Tag,
        /// Response status.
        status: Status,
        /// Human-readable text.
        text: String,
    },
    /// Untagged response (server data).
    Untagged(UntaggedResponse),
    /// Continuation request.
    Continuation {
        /// Optional text/data.
        text: Option<String>,
    },
}

/// Untagged response data the client cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// Server greeting or status.
    Ok {
        /// Human-readable text.
        text: String,
    },
    /// Warning.
    No {
        /// Human-readable text.
        text: String,
    },
    /// Protocol-level error.
    Bad {
        /// Human-readable text.
        text: String,
    },
    /// Pre-authenticated greeting.
    PreAuth {
        /// Human-readable text.
        text: String,
    },
    /// Server is disconnecting.
    Bye {
        /// Human-readable text.
        text: String,
    },
    /// Number of messages in the selected mailbox.
    Exists(u32),
    /// Start of a FETCH response; its items are read by the literal framer.
    Fetch {
        /// Message sequence number.
        seq: SeqNum,
    },
    /// Anything else (`FLAGS`, `RECENT`, `CAPABILITY`, ...).
    Other(String),
}

/// Response parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses one response line, with or without its trailing CRLF.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for an empty line, a tagged line without a
    /// valid completion status, or a malformed message number.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let line = input.strip_suffix(b"\r\n").unwrap_or(input);
        let (first, rest) = split_word(line);

        match first {
            b"" => Err(Error::Parse {
                position: 0,
                message: "Expected *, +, or tag, got empty line".to_string(),
            }),
            b"*" => Self::parse_untagged(rest, line.len() - rest.len()),
            b"+" => Ok(Response::Continuation {
                text: (!rest.is_empty()).then(|| lossy(rest)),
            }),
            tag => Self::parse_tagged(tag, rest, line.len() - rest.len()),
        }
    }

    fn parse_tagged(tag: &[u8], rest: &[u8], position: usize) -> Result<Response> {
        let (word, text) = split_word(rest);
        let status = match Status::parse(word) {
            Some(status @ (Status::Ok | Status::No | Status::Bad)) => status,
            _ => {
                return Err(Error::Parse {
                    position,
                    message: format!("Expected OK, NO or BAD, got {:?}", lossy(word)),
                });
            }
        };

        Ok(Response::Tagged {
            tag: Tag::new(lossy(tag)),
            status,
            text: lossy(text),
        })
    }

    fn parse_untagged(rest: &[u8], position: usize) -> Result<Response> {
        let (word, tail) = split_word(rest);

        if !word.is_empty() && word.iter().all(u8::is_ascii_digit) {
            let n = parse_number(word).ok_or_else(|| Error::Parse {
                position,
                message: format!("Number out of range: {}", lossy(word)),
            })?;
            let (keyword, _) = split_word(tail);

            let untagged = if keyword.eq_ignore_ascii_case(b"EXISTS") {
                UntaggedResponse::Exists(n)
            } else if keyword.eq_ignore_ascii_case(b"FETCH") {
                let seq = SeqNum::new(n).ok_or_else(|| Error::Parse {
                    position,
                    message: "Invalid sequence number 0".to_string(),
                })?;
                UntaggedResponse::Fetch { seq }
            } else {
                UntaggedResponse::Other(lossy(rest))
            };
            return Ok(Response::Untagged(untagged));
        }

        let text = lossy(tail);
        let untagged = match Status::parse(word) {
            Some(Status::Ok) => UntaggedResponse::Ok { text },
            Some(Status::No) => UntaggedResponse::No { text },
            Some(Status::Bad) => UntaggedResponse::Bad { text },
            Some(Status::PreAuth) => UntaggedResponse::PreAuth { text },
            Some(Status::Bye) => UntaggedResponse::Bye { text },
            None => UntaggedResponse::Other(lossy(rest)),
        };
        Ok(Response::Untagged(untagged))
    }
}

/// Splits at the first space.
fn split_word(input: &[u8]) -> (&[u8], &[u8]) {
    input
        .iter()
        .position(|&b| b == b' ')
        .map_or((input, &[][..]), |i| (&input[..i], &input[i + 1..]))
}

/// Parses a run of ASCII digits.
pub(crate) fn parse_number(digits: &[u8]) -> Option<u32> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        let response = ResponseParser::parse(b"* OK IMAP4rev1 server ready\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Ok {
                text: "IMAP4rev1 server ready".to_string()
            })
        );
    }

    #[test]
    fn test_bye() {
        let response = ResponseParser::parse(b"* BYE shutting down\r\n").unwrap();
        assert!(matches!(
            response,
            Response::Untagged(UntaggedResponse::Bye { .. })
        ));
    }

    #[test]
    fn test_tagged() {
        let response = ResponseParser::parse(b"A0001 OK LOGIN completed\r\n").unwrap();
        assert_eq!(
            response,
            Response::Tagged {
                tag: Tag::new("A0001"),
                status: Status::Ok,
                text: "LOGIN completed".to_string(),
            }
        );

        let response = ResponseParser::parse(b"A0002 no [NONEXISTENT] Unknown Mailbox").unwrap();
        assert!(matches!(
            response,
            Response::Tagged {
                status: Status::No,
                ..
            }
        ));
    }

    #[test]
    fn test_tagged_bad_status() {
        assert!(matches!(
            ResponseParser::parse(b"A0001 MAYBE\r\n"),
            Err(Error::Parse { .. })
        ));
        assert!(ResponseParser::parse(b"A0001 BYE\r\n").is_err());
    }

    #[test]
    fn test_exists() {
        let response = ResponseParser::parse(b"* 23 EXISTS\r\n").unwrap();
        assert_eq!(response, Response::Untagged(UntaggedResponse::Exists(23)));
    }

    #[test]
    fn test_fetch() {
        let response =
            ResponseParser::parse(b"* 4 FETCH (BODY[HEADER.FIELDS (TO)] {12}\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Fetch {
                seq: SeqNum::new(4).unwrap()
            })
        );
        assert!(ResponseParser::parse(b"* 0 FETCH (FLAGS ())\r\n").is_err());
    }

    #[test]
    fn test_other() {
        let response = ResponseParser::parse(b"* 2 RECENT\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Other("2 RECENT".to_string()))
        );
        let response = ResponseParser::parse(b"* FLAGS (\\Seen)\r\n").unwrap();
        assert!(matches!(
            response,
            Response::Untagged(UntaggedResponse::Other(_))
        ));
    }

    #[test]
    fn test_continuation() {
        assert_eq!(
            ResponseParser::parse(b"+ Ready\r\n").unwrap(),
            Response::Continuation {
                text: Some("Ready".to_string())
            }
        );
        assert_eq!(
            ResponseParser::parse(b"+\r\n").unwrap(),
            Response::Continuation { text: None }
        );
    }

    #[test]
    fn test_empty_line() {
        assert!(ResponseParser::parse(b"\r\n").is_err());
    }

    #[test]
    fn test_number_overflow() {
        assert!(ResponseParser::parse(b"* 99999999999 EXISTS\r\n").is_err());
    }
}
