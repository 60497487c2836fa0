use std::fmt;

use crate::h1::response::State;

/// Malformed or truncated response data.
///
/// A protocol error is fatal to the response that produced it. The byte stream can no longer be
/// split into responses, so every response queued behind it is lost as well.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// Status code missing, not a number, or outside `100..=999`.
    BadStatusLine(String),
    /// Version tag is neither `HTTP/1.0` nor `HTTP/1.1`.
    UnknownProtocol(String),
    /// Peer closed the stream while the response still expected data.
    UnexpectedConnectionClose(State),
    /// `Content-Length` is not a decimal integer.
    InvalidContentLength,
    /// Chunk size line does not start with a hexadecimal integer.
    InvalidChunkSize,
    /// A status, header, chunk size or trailer line exceeded the configured limit.
    LineTooLong,
    /// More header fields than the configured limit.
    TooManyHeaders,
    /// Bytes were fed to a response that already completed.
    AlreadyComplete,
}

impl std::error::Error for ProtocolError { }

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadStatusLine(line) => write!(f, "bad status line: {line:?}"),
            Self::UnknownProtocol(tag) => write!(f, "unknown protocol: {tag:?}"),
            Self::UnexpectedConnectionClose(state) => {
                write!(f, "connection closed unexpectedly while reading {state}")
            }
            Self::InvalidContentLength => f.write_str("invalid content length"),
            Self::InvalidChunkSize => f.write_str("invalid chunk size"),
            Self::LineTooLong => f.write_str("line too long"),
            Self::TooManyHeaders => f.write_str("too many headers"),
            Self::AlreadyComplete => f.write_str("response already complete"),
        }
    }
}
