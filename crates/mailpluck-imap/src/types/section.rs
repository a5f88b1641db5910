//! Body sections requested with `FETCH`.

use std::fmt;

/// Header fields that can be fetched on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// `From:`
    From,
    /// `To:`
    To,
    /// `Date:`
    Date,
    /// `Subject:`
    Subject,
}

impl HeaderField {
    /// Fields in the order they are reported.
    pub const ALL: [Self; 4] = [Self::From, Self::To, Self::Date, Self::Subject];

    /// Upper-case field name as it appears in `HEADER.FIELDS (...)`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::From => "FROM",
            Self::To => "TO",
            Self::Date => "DATE",
            Self::Subject => "SUBJECT",
        }
    }

    /// Field label including the colon and the single following space.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::From => "From: ",
            Self::To => "To: ",
            Self::Date => "Date: ",
            Self::Subject => "Subject: ",
        }
    }

    /// Bytes between the start of a literal and the start of the value.
    #[must_use]
    pub const fn label_len(self) -> usize {
        self.label().len()
    }

    /// Text shown when the field is absent.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Subject => "<No subject>",
            Self::From | Self::To | Self::Date => "",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        f.write_str(&label[..label.len() - 2])
    }
}

/// The part of a message a `BODY[...]` item refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// The whole message, `BODY[]`.
    Full,
    /// A single header field, `BODY[HEADER.FIELDS (<NAME>)]`.
    HeaderField(HeaderField),
}

impl Section {
    /// The text between the brackets.
    #[must_use]
    pub fn spec(self) -> String {
        match self {
            Self::Full => String::new(),
            Self::HeaderField(field) => format!("HEADER.FIELDS ({})", field.name()),
        }
    }

    /// The item as the server echoes it in a `FETCH` response, e.g.
    /// `BODY[HEADER.FIELDS (TO)]`.
    #[must_use]
    pub fn response_item(self) -> String {
        format!("BODY[{}]", self.spec())
    }
}

impl From<HeaderField> for Section {
    fn from(field: HeaderField) -> Self {
        Self::HeaderField(field)
    }
}
