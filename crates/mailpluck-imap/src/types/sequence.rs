//! Sequence sets for message ranges.

use super::SeqNum;

/// Sequence set for specifying message ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSet {
    /// Single sequence number.
    Single(SeqNum),
    /// Range from start to end of mailbox.
    RangeFrom(SeqNum),
}

impl SequenceSet {
    /// Every message in the mailbox, `1:*`.
    pub const ALL: Self = Self::RangeFrom(SeqNum::FIRST);

    /// Creates a sequence set from a single number.
    #[must_use]
    pub fn single(n: u32) -> Option<Self> {
        SeqNum::new(n).map(Self::Single)
    }
}

impl From<SeqNum> for SequenceSet {
    fn from(seq: SeqNum) -> Self {
        Self::Single(seq)
    }
}

impl std::fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(n) => write!(f, "{n}"),
            Self::RangeFrom(start) => write!(f, "{start}:*"),
        }
    }
}
