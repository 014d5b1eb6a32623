//! Errors raised when parsing core identifiers from text.

use thiserror::Error;

/// Error returned by the [`FromStr`](std::str::FromStr) implementations of
/// the core model types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown service identifier `{0}`")]
    UnknownService(String),

    #[error("unknown node kind `{0}`")]
    UnknownNodeKind(String),

    #[error("unknown subnet polarity `{0}`, expected `public` or `private`")]
    UnknownPolarity(String),
}
