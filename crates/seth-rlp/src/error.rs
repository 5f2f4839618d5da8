use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RlpError {
    #[error("rlp: input too short")]
    InputTooShort,
    #[error("rlp: trailing bytes after item")]
    TrailingBytes,
    #[error("rlp: expected a string item")]
    ExpectedString,
    #[error("rlp: expected a list item")]
    ExpectedList,
    #[error("rlp: non-canonical size encoding")]
    NonCanonicalSize,
    #[error("rlp: length overflows usize")]
    LengthOverflow,
    #[error("rlp: cannot encode negative big integer")]
    NegativeBigInt,
    #[error("rlp: unexpected item count {0}")]
    UnexpectedItemCount(usize),
}
