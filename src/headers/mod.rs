//! HTTP Headers.
//!
//! - [`HeaderMap`] received response header fields
//! - [`IntoHeaderValue`] values accepted when writing request headers
mod map;
mod value;

pub use map::{HeaderMap, Iter};
pub use value::IntoHeaderValue;

#[cfg(test)]
mod test;
