//! Pipelined HTTP/1.1 Client
//!
//! A [`Connection`] writes requests without waiting for earlier responses, and decodes the
//! responses incrementally as bytes arrive, delivering status, headers and body fragments to a
//! [`Handler`] instead of buffering whole responses.
//!
//! The connection is poll driven: call [`Connection::pump`] while [`Connection::outstanding`]
//! returns `true`. Each pump reads at most one buffer of bytes and never waits longer than the
//! configured [`Config::poll_timeout`].
#![warn(missing_debug_implementations)]

mod log;
mod common;

pub mod http;
pub mod headers;
pub mod h1;
pub mod transport;
pub mod config;
pub mod error;

pub use config::{Config, Limits, Unsolicited};
pub use error::{Error, ErrorKind};
pub use h1::ProtocolError;
pub use h1::connection::Connection;
pub use h1::response::{Callbacks, Handler, Response, State};
pub use http::{Method, StatusCode, Version};
pub use transport::{Connect, TcpConnector, Transport};
