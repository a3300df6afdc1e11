use thiserror::Error;

/// Errors produced while decoding bencode.
///
/// Every variant records the byte offset where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BencodeError {
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("invalid integer at byte {offset}: {reason}")]
    InvalidInteger { offset: usize, reason: &'static str },

    #[error("invalid string length at byte {offset}")]
    InvalidStringLength { offset: usize },

    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedChar { offset: usize, found: char },

    #[error("dictionary key at byte {offset} is not a byte string")]
    NonStringKey { offset: usize },

    #[error("duplicate dictionary key at byte {offset}")]
    DuplicateKey { offset: usize },

    #[error("trailing data after value at byte {offset}")]
    TrailingData { offset: usize },

    #[error("nesting too deep at byte {offset}")]
    NestingTooDeep { offset: usize },

    #[error("top-level value is not a dictionary")]
    NotADictionary,
}

impl BencodeError {
    /// Byte offset in the input where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            BencodeError::UnexpectedEof { offset }
            | BencodeError::InvalidInteger { offset, .. }
            | BencodeError::InvalidStringLength { offset }
            | BencodeError::UnexpectedChar { offset, .. }
            | BencodeError::NonStringKey { offset }
            | BencodeError::DuplicateKey { offset }
            | BencodeError::TrailingData { offset }
            | BencodeError::NestingTooDeep { offset } => *offset,
            BencodeError::NotADictionary => 0,
        }
    }
}
