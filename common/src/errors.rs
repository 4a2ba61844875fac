//! Errors that can occur while normalizing numbers or encoding calls

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors raised when a token cannot be interpreted as a number, address,
/// short string or field element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The token is neither a decimal nor a `0x`-prefixed hex integer
    InvalidNumber(String),
    /// The value needs more than 64 hex digits
    AddressTooLong(String),
    /// The short string does not fit in a felt
    ShortStringTooLong(String),
    /// The short string contains non-ASCII characters
    NonAsciiShortString(String),
    /// The value is not below the field prime
    NotAFelt(String),
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidNumber(s) => write!(f, "invalid number: {}", s),
            FormatError::AddressTooLong(s) => {
                write!(f, "address exceeds 64 hex digits: {}", s)
            }
            FormatError::ShortStringTooLong(s) => {
                write!(f, "short string exceeds 31 characters: {}", s)
            }
            FormatError::NonAsciiShortString(s) => {
                write!(f, "short string is not ASCII: {}", s)
            }
            FormatError::NotAFelt(s) => write!(f, "value is not a field element: {}", s),
        }
    }
}

impl Error for FormatError {}

/// Errors raised when a call cannot be built or encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A raw call did not consist of a target, a function name and arguments
    InvalidCallShape(usize),
    /// The function name is empty
    EmptyFunctionName,
    /// No selector can be derived from the function name
    NonAsciiFunctionName(String),
    /// The calldata does not fit the 32-bit offsets of the call array
    CalldataTooLong,
    /// One of the call's fields is malformed
    Format(FormatError),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCallShape(n) => write!(
                f,
                "invalid call parameters: expected a target and a function name, got {} tokens",
                n
            ),
            ValidationError::EmptyFunctionName => write!(f, "function name is empty"),
            ValidationError::NonAsciiFunctionName(s) => {
                write!(f, "function name is not ASCII: {}", s)
            }
            ValidationError::CalldataTooLong => write!(f, "calldata is too long"),
            ValidationError::Format(e) => write!(f, "invalid call field: {}", e),
        }
    }
}

impl Error for ValidationError {}

impl From<FormatError> for ValidationError {
    fn from(e: FormatError) -> Self {
        ValidationError::Format(e)
    }
}
