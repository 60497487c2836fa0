//! Connection level errors.
use std::{fmt, io};

use crate::h1::ProtocolError;

/// An error that terminated a [`Connection`].
///
/// When returned, the connection has already been closed and every outstanding response
/// discarded. Issuing a new request reconnects.
///
/// [`Connection`]: crate::Connection
pub struct Error {
    kind: ErrorKind,
    peer: Option<Box<str>>,
}

/// The reason an [`Error`] occurred.
#[derive(Debug)]
pub enum ErrorKind {
    /// The peer sent malformed or truncated response data.
    Protocol(ProtocolError),
    /// Connect, read or write failure.
    Io(io::Error),
    /// The peer sent bytes while no response was outstanding.
    UnsolicitedData(usize),
}

impl Error {
    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consumes the error, returning the error kind.
    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Returns `host:port` of the failing connection, if known.
    #[inline]
    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    /// Returns the protocol error, if this is one.
    pub fn as_protocol(&self) -> Option<&ProtocolError> {
        match &self.kind {
            ErrorKind::Protocol(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if the error came from the transport.
    #[inline]
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io(_))
    }

    pub(crate) fn with_peer(mut self, host: &str, port: u16) -> Self {
        let mut peer = String::with_capacity(host.len() + 6);
        peer.push_str(host);
        peer.push(':');
        peer.push_str(itoa::Buffer::new().format(port));
        self.peer = Some(peer.into_boxed_str());
        self
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self { kind, peer: None }
    }
}

impl From<ProtocolError> for Error {
    #[inline]
    fn from(v: ProtocolError) -> Self {
        ErrorKind::Protocol(v).into()
    }
}

impl From<io::Error> for Error {
    #[inline]
    fn from(v: io::Error) -> Self {
        ErrorKind::Io(v).into()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Protocol(err) => Some(err),
            ErrorKind::Io(err) => Some(err),
            ErrorKind::UnsolicitedData(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(peer) = &self.peer {
            write!(f, "{peer}: ")?;
        }
        self.kind.fmt(f)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("Error");
        f.field("kind", &self.kind);
        if let Some(peer) = &self.peer {
            f.field("peer", peer);
        }
        f.finish()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(err) => write!(f, "protocol error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::UnsolicitedData(len) => write!(f, "{len} unsolicited bytes after last response"),
        }
    }
}
