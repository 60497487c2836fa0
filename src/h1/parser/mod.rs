//! HTTP/1.1 response line parsing.
//!
//! [`LineBuffer`] works on chunked bytes, given any length of bytes it buffers up to the next
//! `\n` and reports how many bytes it used. If the terminator is not found, it returns
//! [`ParseResult::Pending`] after buffering everything, and the next chunk continues the same
//! line. `\r` is dropped wherever it appears, so both `\r\n` and bare `\n` terminate a line.
//!
//! The remaining functions parse one complete line each:
//!
//! - [`parse_status_line`] for `VERSION SP STATUS SP REASON`
//! - [`HeaderFolder`] for header fields, including folded continuation lines
//! - [`parse_chunk_size`] for the hexadecimal size line of a chunked body
//!
//! [`ParseResult::Pending`]: crate::common::ParseResult::Pending
use std::borrow::Cow;

use crate::common::ParseResult;
use crate::h1::ProtocolError;
use crate::headers::HeaderMap;
use crate::http::{StatusCode, Version};


const MAX_CHUNK_SIZE: u64 = u64::MAX >> 1;

// ===== Line =====

/// Accumulate bytes into a single line.
#[derive(Clone, Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    /// Create new empty [`LineBuffer`].
    #[inline]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Buffer bytes until the end of line.
    ///
    /// Returns `ParseResult::Ok(used)` when the line is complete, `used` includes the `\n`.
    /// Returns `ParseResult::Pending` when all of `bytes` is buffered without finding the end
    /// of line.
    pub fn fill(&mut self, bytes: &[u8], max_len: usize) -> ParseResult<usize, ProtocolError> {
        let (line, used, complete) = match bytes.iter().position(|&b| b == b'\n') {
            Some(lf) => (&bytes[..lf], lf + 1, true),
            None => (bytes, bytes.len(), false),
        };

        self.buf.extend(line.iter().filter(|&&b| b != b'\r'));

        if self.buf.len() > max_len {
            return ParseResult::Err(ProtocolError::LineTooLong);
        }

        match complete {
            true => ParseResult::Ok(used),
            false => ParseResult::Pending,
        }
    }

    /// Returns the buffered line, invalid UTF-8 is replaced.
    #[inline]
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buf)
    }

    /// Returns `true` if nothing is buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discard the buffered line, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

// ===== Status Line =====

/// Parsed response status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    /// Recognized protocol version.
    pub version: Version,
    /// Version token exactly as received, e.g: `HTTP/1.1`.
    pub tag: String,
    /// Status code.
    pub status: StatusCode,
    /// Reason phrase, may be empty.
    pub reason: String,
}

/// Parse `VERSION SP STATUS SP REASON`.
///
/// Leading whitespace and runs of whitespace between tokens are skipped. The reason is the rest
/// of the line.
pub fn parse_status_line(line: &str) -> Result<StatusLine, ProtocolError> {
    let (tag, rest) = split_token(line.trim_start());
    let (status, reason) = split_token(rest.trim_start());
    let reason = reason.trim_start();

    let status = status
        .parse::<u16>()
        .ok()
        .and_then(StatusCode::from_u16)
        .ok_or_else(|| ProtocolError::BadStatusLine(line.to_owned()))?;

    let version = Version::from_tag(tag)
        .ok_or_else(|| ProtocolError::UnknownProtocol(tag.to_owned()))?;

    Ok(StatusLine {
        version,
        tag: tag.to_owned(),
        status,
        reason: reason.to_owned(),
    })
}

/// Split at the first whitespace.
fn split_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(at) => s.split_at(at),
        None => (s, ""),
    }
}

// ===== Header =====

/// Assemble header fields from lines, joining folded lines.
///
/// A field is only stored when the next field starts or [`flush`] is called, since a following
/// indented line may still extend its value.
///
/// [`flush`]: HeaderFolder::flush
#[derive(Clone, Debug, Default)]
pub struct HeaderFolder {
    accum: String,
}

impl HeaderFolder {
    /// Create new empty [`HeaderFolder`].
    #[inline]
    pub const fn new() -> Self {
        Self { accum: String::new() }
    }

    /// Process one non-empty header line.
    ///
    /// An indented line continues the current field, joined by a single space. An indented line
    /// with no field in progress is ignored.
    pub fn push_line(
        &mut self,
        line: &str,
        headers: &mut HeaderMap,
        max_headers: usize,
    ) -> Result<(), ProtocolError> {
        if line.starts_with(char::is_whitespace) {
            if !self.accum.is_empty() {
                self.accum.push(' ');
                self.accum.push_str(line.trim_start());
            }
            return Ok(());
        }

        self.flush(headers, max_headers)?;
        self.accum.push_str(line);
        Ok(())
    }

    /// Store the field in progress, if any.
    ///
    /// The name is everything before the first `:`, the value is the rest with leading
    /// whitespace removed. A repeated name replaces the previous value.
    pub fn flush(&mut self, headers: &mut HeaderMap, max_headers: usize) -> Result<(), ProtocolError> {
        if self.accum.is_empty() {
            return Ok(());
        }

        let (name, value) = match self.accum.split_once(':') {
            Some((name, value)) => (name, value.trim_start()),
            None => (self.accum.as_str(), ""),
        };

        headers.insert(name, value);
        self.accum.clear();

        if headers.len() > max_headers {
            return Err(ProtocolError::TooManyHeaders);
        }
        Ok(())
    }

    /// Discard the field in progress.
    #[inline]
    pub fn clear(&mut self) {
        self.accum.clear();
    }
}

// ===== Chunked =====

/// Parse the size of the next chunk.
///
/// Leading whitespace is skipped, and anything after the hexadecimal digits, such as a chunk
/// extension, is ignored.
pub fn parse_chunk_size(line: &str) -> Result<u64, ProtocolError> {
    let line = line.trim_start();
    let digits_len = line
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(line.len());

    if digits_len == 0 {
        return Err(ProtocolError::InvalidChunkSize);
    }

    match u64::from_str_radix(&line[..digits_len], 16) {
        Ok(size) if size <= MAX_CHUNK_SIZE => Ok(size),
        _ => Err(ProtocolError::InvalidChunkSize),
    }
}

/// Parse a `Content-Length` value.
pub fn parse_content_length(value: &str) -> Result<u64, ProtocolError> {
    let value = value.trim_ascii();
    // `u64::from_str` accepts a leading `+`
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProtocolError::InvalidContentLength);
    }
    value.parse().map_err(|_| ProtocolError::InvalidContentLength)
}
