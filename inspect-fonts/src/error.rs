//! Errors produced while parsing font data.

use sfnt_types::Tag;
use thiserror::Error;

/// An error that occurs when reading font data.
///
/// Apart from [`InvalidSfnt`], every variant is recoverable at a table
/// boundary: the dispatcher discards the table's partial subtree and turns
/// the error's `Display` text into the reason clause of a warning.
///
/// [`InvalidSfnt`]: ReadError::InvalidSfnt
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The first four bytes are not a recognized font magic. Fatal.
    #[error("not a TrueType font")]
    InvalidSfnt(u32),
    /// A read or seek went past the end of the available bytes.
    #[error("read out of bounds")]
    OutOfBounds,
    /// A version field does not match the supported set.
    #[error("invalid table version")]
    InvalidVersion,
    /// A table required by the one being parsed is not in the directory.
    #[error("no '{0}' table")]
    TableIsMissing(Tag),
    /// An intra-table structural constraint was violated.
    #[error("{0}")]
    MalformedData(&'static str),
    /// A CFF nibble-packed float could not be decoded.
    #[error("invalid float")]
    InvalidFloat,
    /// An AAT state machine is self-inconsistent or unbounded.
    #[error("invalid state machine")]
    InvalidStateMachine,
    /// The per-parse operation budget ran out.
    #[error("operation budget exceeded")]
    BudgetExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_reason_phrasings() {
        assert_eq!(ReadError::OutOfBounds.to_string(), "read out of bounds");
        assert_eq!(
            ReadError::TableIsMissing(Tag::new(b"maxp")).to_string(),
            "no 'maxp' table"
        );
        assert_eq!(ReadError::InvalidVersion.to_string(), "invalid table version");
    }
}
