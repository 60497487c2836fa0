//! HTTP/1.1 Protocol.
//!
//! - [`parser`] contains line level parsing
//! - [`framing`] decides how a response body ends
//! - [`response`] contains the per response state machine
//! - [`connection`] contains the integration of all the components above into single API
pub mod parser;
pub mod framing;
pub mod response;
pub mod connection;

mod error;

pub use error::ProtocolError;
