//! HTTP/1.1 response decoder.
//!
//! [`Response`] is a state machine over the bytes of a single response. It owns no transport,
//! bytes are handed to [`Response::feed`] in chunks of any size, and each call consumes a prefix
//! of the chunk. Decoded events are delivered to a [`Handler`]:
//!
//! - [`Handler::on_begin`] once the status line and header section are parsed and the body
//!   framing is known,
//! - [`Handler::on_data`] for each contiguous body fragment, in stream order,
//! - [`Handler::on_complete`] once the response is fully decoded.
//!
//! Splitting the input differently never changes the sequence of events.
use std::fmt;

use crate::common::ParseResult;
use crate::config::Limits;
use crate::h1::ProtocolError;
use crate::h1::framing::Framing;
use crate::h1::parser::{HeaderFolder, LineBuffer, StatusLine, parse_chunk_size, parse_status_line};
use crate::headers::HeaderMap;
use crate::http::{Method, StatusCode, Version};
use crate::log::{debug, trace};

mod handler;

pub use handler::{Callbacks, Handler};

#[cfg(test)]
mod test;

/// Response decoding state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// Waiting for the status line.
    StatusLine,
    /// Reading header lines.
    Headers,
    /// Reading body bytes, either length-delimited, connection-close-terminated, or the data of
    /// the current chunk.
    Body,
    /// Waiting for a chunk size line.
    ChunkLen,
    /// Waiting for the line terminator after chunk data.
    ChunkEnd,
    /// Reading and discarding trailer fields after the last chunk.
    Trailers,
    /// Fully decoded.
    Complete,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::StatusLine => "status line",
            State::Headers => "headers",
            State::Body => "body",
            State::ChunkLen => "chunk size",
            State::ChunkEnd => "chunk end",
            State::Trailers => "trailers",
            State::Complete => "complete",
        })
    }
}

/// A single in-flight HTTP/1.1 response.
#[derive(Debug)]
pub struct Response {
    state: State,
    method: Method,
    status_line: Option<StatusLine>,
    headers: HeaderMap,
    folder: HeaderFolder,
    line: LineBuffer,
    bytes_read: u64,
    chunked: bool,
    chunk_remaining: u64,
    content_length: Option<u64>,
    will_close: bool,
    limits: Limits,
}

impl Response {
    /// Create [`Response`] expecting the answer to a request with given method.
    pub fn new(method: impl Into<Method>) -> Self {
        Self::with_limits(method, Limits::default())
    }

    /// Create [`Response`] with custom parsing limits.
    pub fn with_limits(method: impl Into<Method>, limits: Limits) -> Self {
        Self {
            state: State::StatusLine,
            method: method.into(),
            status_line: None,
            headers: HeaderMap::new(),
            folder: HeaderFolder::new(),
            line: LineBuffer::new(),
            bytes_read: 0,
            chunked: false,
            chunk_remaining: 0,
            content_length: None,
            will_close: false,
            limits,
        }
    }

    // ===== Decoding =====

    /// Decode a prefix of `bytes`, returning how many bytes were used.
    ///
    /// Bytes are used until the input is exhausted or the response completes, so a return value
    /// smaller than `bytes.len()` means the rest belongs to the next response.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] on malformed data, and [`ProtocolError::AlreadyComplete`] if
    /// the response is already complete. After an error the response must be discarded.
    pub fn feed<H>(&mut self, bytes: &[u8], handler: &mut H) -> Result<usize, ProtocolError>
    where
        H: Handler + ?Sized,
    {
        if self.state == State::Complete {
            return Err(ProtocolError::AlreadyComplete);
        }

        let mut used = 0;

        while used < bytes.len() && self.state != State::Complete {
            let rest = &bytes[used..];

            if self.state == State::Body {
                used += match self.chunked {
                    true => self.chunk_data(rest, handler),
                    false => self.body_data(rest, handler),
                };
                continue;
            }

            match self.line.fill(rest, self.limits.max_line_len) {
                ParseResult::Ok(n) => {
                    used += n;
                    self.process_line(handler)?;
                    self.line.clear();
                }
                ParseResult::Pending => used = bytes.len(),
                ParseResult::Err(err) => return Err(err),
            }
        }

        Ok(used)
    }

    /// Notify the response that the peer closed the stream.
    ///
    /// A body without length or chunked framing ends here and the response completes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnexpectedConnectionClose`] in any other incomplete state.
    pub fn notify_closed<H>(&mut self, handler: &mut H) -> Result<(), ProtocolError>
    where
        H: Handler + ?Sized,
    {
        match self.state {
            State::Complete => Ok(()),
            State::Body if !self.chunked && self.content_length.is_none() => {
                debug!("body terminated by connection close after {} bytes", self.bytes_read);
                self.finish(handler);
                Ok(())
            }
            state => Err(ProtocolError::UnexpectedConnectionClose(state)),
        }
    }

    fn process_line<H>(&mut self, handler: &mut H) -> Result<(), ProtocolError>
    where
        H: Handler + ?Sized,
    {
        match self.state {
            State::StatusLine => {
                let status_line = parse_status_line(&self.line.as_str())?;
                debug!("{} {} {}", status_line.tag, status_line.status.as_u16(), status_line.reason);
                self.status_line = Some(status_line);
                self.folder.clear();
                self.state = State::Headers;
            }
            State::Headers => {
                let max_headers = self.limits.max_headers;
                if !self.line.is_empty() {
                    return self.folder.push_line(&self.line.as_str(), &mut self.headers, max_headers);
                }

                self.folder.flush(&mut self.headers, max_headers)?;

                if self.head().status == StatusCode::CONTINUE {
                    // interim response, the final status line follows
                    trace!("skipping 100 continue");
                    self.status_line = None;
                    self.headers.clear();
                    self.state = State::StatusLine;
                } else {
                    self.begin_body(handler)?;
                }
            }
            State::ChunkLen => {
                let size = parse_chunk_size(&self.line.as_str())?;
                if size == 0 {
                    self.folder.clear();
                    self.state = State::Trailers;
                } else {
                    self.chunk_remaining = size;
                    self.state = State::Body;
                }
            }
            State::ChunkEnd => {
                self.state = State::ChunkLen;
            }
            State::Trailers => {
                // trailer fields are discarded
                if self.line.is_empty() {
                    self.finish(handler);
                }
            }
            State::Body | State::Complete => unreachable!("line processed in {} state", self.state),
        }
        Ok(())
    }

    fn begin_body<H>(&mut self, handler: &mut H) -> Result<(), ProtocolError>
    where
        H: Handler + ?Sized,
    {
        let head = self.head();
        let framing = Framing::new(head.version, head.status, &self.method, &self.headers)?;

        debug!(
            "{} framing: chunked={}, length={:?}, close={}",
            self.method, framing.chunked, framing.content_length, framing.will_close,
        );

        self.chunked = framing.chunked;
        self.content_length = framing.content_length;
        self.will_close = framing.will_close;

        handler.on_begin(self);

        if self.chunked {
            self.state = State::ChunkLen;
        } else if self.content_length == Some(0) {
            self.state = State::Body;
            self.finish(handler);
        } else {
            self.state = State::Body;
        }
        Ok(())
    }

    /// Length-delimited or connection-close-terminated body.
    fn body_data<H>(&mut self, bytes: &[u8], handler: &mut H) -> usize
    where
        H: Handler + ?Sized,
    {
        let n = match self.content_length {
            Some(len) => clamp(bytes.len(), len - self.bytes_read),
            None => bytes.len(),
        };

        handler.on_data(self, &bytes[..n]);
        self.bytes_read += n as u64;

        if self.content_length == Some(self.bytes_read) {
            self.finish(handler);
        }
        n
    }

    fn chunk_data<H>(&mut self, bytes: &[u8], handler: &mut H) -> usize
    where
        H: Handler + ?Sized,
    {
        let n = clamp(bytes.len(), self.chunk_remaining);

        handler.on_data(self, &bytes[..n]);
        self.bytes_read += n as u64;
        self.chunk_remaining -= n as u64;

        if self.chunk_remaining == 0 {
            self.state = State::ChunkEnd;
        }
        n
    }

    fn finish<H>(&mut self, handler: &mut H)
    where
        H: Handler + ?Sized,
    {
        trace!("response complete, {} body bytes", self.bytes_read);
        self.state = State::Complete;
        handler.on_complete(self);
    }

    fn head(&self) -> &StatusLine {
        match &self.status_line {
            Some(head) => head,
            None => panic!("response status line is not parsed yet"),
        }
    }

    // ===== Accessors =====

    /// Returns the current decoding state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns `true` if the response is fully decoded.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    /// Returns the method of the request this response answers.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the parsed status line, or `None` if it is not received yet.
    #[inline]
    pub fn status_line(&self) -> Option<&StatusLine> {
        self.status_line.as_ref()
    }

    /// Returns the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status line is not parsed yet.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.head().status
    }

    /// Returns the reason phrase.
    ///
    /// # Panics
    ///
    /// Panics if the status line is not parsed yet.
    #[inline]
    pub fn reason(&self) -> &str {
        &self.head().reason
    }

    /// Returns the protocol version.
    ///
    /// # Panics
    ///
    /// Panics if the status line is not parsed yet.
    #[inline]
    pub fn version(&self) -> Version {
        self.head().version
    }

    /// Returns the version token as received, e.g: `HTTP/1.1`.
    ///
    /// # Panics
    ///
    /// Panics if the status line is not parsed yet.
    #[inline]
    pub fn http_version(&self) -> &str {
        &self.head().tag
    }

    /// Returns a header value, name is case-insensitive.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns all header fields received so far.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the number of body bytes delivered so far.
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the body length, `None` if unknown or chunked.
    ///
    /// Only meaningful once the header section is complete.
    #[inline]
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Returns `true` if the body uses chunked transfer coding.
    #[inline]
    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    /// Returns `true` if the peer is expected to close the connection after this response.
    ///
    /// Only meaningful once the header section is complete.
    #[inline]
    pub fn will_close(&self) -> bool {
        self.will_close
    }
}

fn clamp(available: usize, remaining: u64) -> usize {
    usize::try_from(remaining).map_or(available, |remaining| available.min(remaining))
}
