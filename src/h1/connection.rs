//! Pipelined HTTP/1.1 client connection.
//!
//! Requests are written as soon as their header section ends, without waiting for earlier
//! responses. Each request pushes a [`Response`] to the back of the outstanding queue, and
//! [`Connection::pump`] feeds received bytes to the front of it, so responses complete in the
//! order their requests were sent.
//!
//! ```no_run
//! use h1pipe::{Callbacks, Connection, Response};
//!
//! # fn main() -> Result<(), h1pipe::Error> {
//! let handler = Callbacks::new(
//!     |res: &Response| println!("{} {}", res.status(), res.reason()),
//!     |_: &Response, data: &[u8]| print!("{}", String::from_utf8_lossy(data)),
//!     |_: &Response| println!(),
//! );
//! let mut conn = Connection::new("example.com", 80).with_handler(handler);
//!
//! conn.request("GET", "/", &[], None)?;
//! conn.request("GET", "/about", &[], None)?;
//!
//! while conn.outstanding() {
//!     conn.pump()?;
//! }
//! # Ok(())
//! # }
//! ```
use bytes::{BufMut, BytesMut};
use std::collections::VecDeque;
use std::io;

use crate::config::{Config, Unsolicited};
use crate::error::{Error, ErrorKind};
use crate::h1::ProtocolError;
use crate::h1::response::{Handler, Response, State};
use crate::headers::IntoHeaderValue;
use crate::http::Method;
use crate::log::{debug, trace, warning};
use crate::transport::{Connect, TcpConnector, Transport};

const CRLF: &[u8] = b"\r\n";
const DEFAULT_PORT: u16 = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestState {
    Idle,
    RequestStarted,
}

/// A client connection to a single `host:port`.
///
/// The transport is established on the first write and reestablished after it is closed.
/// All responses report to the connection's [`Handler`].
pub struct Connection<H = (), C: Connect = TcpConnector> {
    host: String,
    port: u16,
    config: Config,
    connector: C,
    transport: Option<C::Transport>,
    handler: H,
    request_state: RequestState,
    outgoing: Vec<String>,
    outstanding: VecDeque<Response>,
    read_buffer: BytesMut,
}

impl Connection {
    /// Create a TCP [`Connection`] to `host:port`.
    ///
    /// This function does not connect.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_connector(host, port, TcpConnector)
    }
}

impl<C: Connect> Connection<(), C> {
    /// Create a [`Connection`] that opens its transport with given connector.
    pub fn with_connector(host: impl Into<String>, port: u16, connector: C) -> Self {
        Self {
            host: host.into(),
            port,
            config: Config::new(),
            connector,
            transport: None,
            handler: (),
            request_state: RequestState::Idle,
            outgoing: Vec::new(),
            outstanding: VecDeque::new(),
            read_buffer: BytesMut::new(),
        }
    }
}

impl<H: Handler, C: Connect> Connection<H, C> {
    /// Replace the configuration.
    ///
    /// Parsing limits apply to responses of requests issued afterwards.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Register the handler that receives events of every response on this connection.
    pub fn with_handler<H2: Handler>(self, handler: H2) -> Connection<H2, C> {
        Connection {
            host: self.host,
            port: self.port,
            config: self.config,
            connector: self.connector,
            transport: self.transport,
            handler,
            request_state: self.request_state,
            outgoing: self.outgoing,
            outstanding: self.outstanding,
            read_buffer: self.read_buffer,
        }
    }

    /// Use an already connected transport, closing the current one if any.
    pub fn with_transport(mut self, transport: C::Transport) -> Self {
        self.disconnect();
        self.transport = Some(transport);
        self
    }

    /// Replace the handler, returning the previous one.
    ///
    /// Responses already outstanding report to the new handler from now on.
    pub fn set_handler(&mut self, handler: H) -> H {
        std::mem::replace(&mut self.handler, handler)
    }

    // ===== Request =====

    /// Start a request.
    ///
    /// Writes nothing yet. The request line is buffered together with the mandatory `Host` and
    /// `Accept-Encoding: identity` headers, and a response is queued for it.
    ///
    /// # Panics
    ///
    /// Panics if a previous request has not been ended by [`endheaders`].
    ///
    /// [`endheaders`]: Connection::endheaders
    pub fn putrequest(&mut self, method: impl Into<Method>, url: &str) {
        assert!(
            self.request_state == RequestState::Idle,
            "request already issued, call `endheaders` first"
        );

        let method = method.into();
        debug!("{} {} HTTP/1.1", method, url);

        let mut line = String::with_capacity(method.as_str().len() + url.len() + 10);
        line.push_str(method.as_str());
        line.push(' ');
        line.push_str(url);
        line.push_str(" HTTP/1.1");
        self.outgoing.push(line);
        self.request_state = RequestState::RequestStarted;

        let mut host = String::with_capacity(self.host.len() + 8);
        if self.host.contains(':') {
            // ipv6 literal
            host.push('[');
            host.push_str(&self.host);
            host.push(']');
        } else {
            host.push_str(&self.host);
        }
        if self.port != DEFAULT_PORT {
            host.push(':');
            host.push_str(itoa::Buffer::new().format(self.port));
        }
        self.putheader("Host", host);
        self.putheader("Accept-Encoding", "identity");

        self.outstanding.push_back(Response::with_limits(method, self.config.limits()));
    }

    /// Add a header to the started request.
    ///
    /// # Panics
    ///
    /// Panics if no request is started.
    pub fn putheader(&mut self, name: &str, value: impl IntoHeaderValue) {
        assert!(
            self.request_state == RequestState::RequestStarted,
            "no request started, call `putrequest` first"
        );

        let mut line = String::with_capacity(name.len() + 16);
        line.push_str(name);
        line.push_str(": ");
        value.write_value(&mut line);
        self.outgoing.push(line);
    }

    /// End the header section and write the request head.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting or writing fails, the connection is then closed.
    ///
    /// # Panics
    ///
    /// Panics if no request is started.
    pub fn endheaders(&mut self) -> Result<(), Error> {
        assert!(
            self.request_state == RequestState::RequestStarted,
            "no request started, call `putrequest` first"
        );
        self.request_state = RequestState::Idle;

        let len = self.outgoing.iter().map(|line| line.len() + CRLF.len()).sum::<usize>();
        let mut head = BytesMut::with_capacity(len + CRLF.len());
        for line in self.outgoing.drain(..) {
            head.put_slice(line.as_bytes());
            head.put_slice(CRLF);
        }
        head.put_slice(CRLF);

        self.send(&head)
    }

    /// Write raw bytes, such as a request body, connecting first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting or writing fails, the connection is then closed.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let result = self.connect().and_then(|transport| transport.write_all(bytes));
        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Issue a complete request.
    ///
    /// A `Content-Length` header is added for `body` unless `headers` already has one, names
    /// are compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting or writing fails, the connection is then closed.
    ///
    /// # Panics
    ///
    /// Panics if a previous request has not been ended by [`endheaders`].
    ///
    /// [`endheaders`]: Connection::endheaders
    pub fn request(
        &mut self,
        method: impl Into<Method>,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> Result<(), Error> {
        let has_length = headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-length"));

        self.putrequest(method, url);

        if let Some(body) = body
            && !has_length
        {
            self.putheader("Content-Length", body.len());
        }

        for (name, value) in headers {
            self.putheader(name, *value);
        }

        self.endheaders()?;

        if let Some(body) = body {
            self.send(body)?;
        }
        Ok(())
    }

    // ===== Response =====

    /// Read and decode available response bytes.
    ///
    /// Does nothing if no sent request awaits a response, and returns without reading if the
    /// transport is not readable within the configured [`poll_timeout`]. May be called while a
    /// later request is being built, the request is only awaited once [`endheaders`] sends it.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, malformed response data, the peer closing the
    /// stream while responses are still expected, or unsolicited bytes. The connection is then
    /// closed and every outstanding response discarded.
    ///
    /// [`poll_timeout`]: Config::poll_timeout
    /// [`endheaders`]: Connection::endheaders
    pub fn pump(&mut self) -> Result<(), Error> {
        if self.sent() == 0 {
            return Ok(());
        }

        let Some(transport) = self.transport.as_mut() else {
            panic!("outstanding responses without a connection");
        };

        let size = self.config.get_read_buffer_size();
        if self.read_buffer.len() < size {
            self.read_buffer.resize(size, 0);
        }

        let read = match transport.poll_readable(self.config.get_poll_timeout()) {
            Ok(false) => return Ok(()),
            Ok(true) => transport.read(&mut self.read_buffer[..size]),
            Err(err) => Err(err),
        };

        match read {
            Ok(0) => self.closed_by_peer(),
            Ok(n) => self.dispatch(n),
            Err(err) if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => Ok(()),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Feed the first `len` bytes of the read buffer to the sent responses, front first.
    fn dispatch(&mut self, len: usize) -> Result<(), Error> {
        let mut used = 0;

        while used < len && self.sent() != 0 {
            let Some(response) = self.outstanding.front_mut() else {
                break;
            };

            match response.feed(&self.read_buffer[used..len], &mut self.handler) {
                Ok(n) => used += n,
                Err(err) => {
                    warning!("protocol error from {}:{}: {err}", self.host, self.port);
                    return Err(self.fail(err.into()));
                }
            }

            if response.is_complete() {
                let will_close = response.will_close();
                self.outstanding.pop_front();
                trace!("response complete, {} outstanding", self.outstanding.len());

                if will_close && self.sent() == 0 {
                    self.disconnect();
                }
            }
        }

        let rest = len - used;
        if rest == 0 {
            return Ok(());
        }

        match self.config.get_unsolicited() {
            Unsolicited::Error => Err(self.fail(ErrorKind::UnsolicitedData(rest).into())),
            Unsolicited::Discard => {
                warning!("discarding {rest} unsolicited bytes from {}:{}", self.host, self.port);
                Ok(())
            }
        }
    }

    /// End of stream, the front response either ends its body here or fails.
    ///
    /// Any other sent response can no longer be answered, which is an error as well.
    fn closed_by_peer(&mut self) -> Result<(), Error> {
        debug!("{}:{} closed the connection", self.host, self.port);

        let result = match self.outstanding.pop_front() {
            Some(mut response) => response.notify_closed(&mut self.handler),
            None => Ok(()),
        };

        let result = result.and_then(|()| match self.sent() {
            0 => Ok(()),
            _lost => {
                warning!("connection closed with {_lost} responses outstanding");
                Err(ProtocolError::UnexpectedConnectionClose(State::StatusLine))
            }
        });

        match result {
            Ok(()) => {
                self.disconnect();
                Ok(())
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Number of queued responses whose request has been sent.
    fn sent(&self) -> usize {
        match self.request_state {
            RequestState::Idle => self.outstanding.len(),
            RequestState::RequestStarted => self.outstanding.len() - 1,
        }
    }

    fn connect(&mut self) -> io::Result<&mut C::Transport> {
        let transport = match self.transport.take() {
            Some(transport) => transport,
            None => self.connector.connect(&self.host, self.port, &self.config)?,
        };
        Ok(self.transport.insert(transport))
    }

    /// Drop the transport only, outstanding responses are kept.
    fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            debug!("closing connection to {}:{}", self.host, self.port);
            if let Err(_err) = transport.close() {
                debug!("close failed: {_err}");
            }
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        self.close();
        err.with_peer(&self.host, self.port)
    }

    /// Close the transport and discard every outstanding response without notifying the
    /// handler.
    ///
    /// A request started but not ended is discarded as well.
    pub fn close(&mut self) {
        self.disconnect();
        self.outstanding.clear();
        self.outgoing.clear();
        self.request_state = RequestState::Idle;
    }

    // ===== Accessors =====

    /// Returns `true` if any response is still outstanding.
    ///
    /// This is the polling loop condition.
    #[inline]
    pub fn outstanding(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Returns the number of outstanding responses.
    #[inline]
    pub fn pending(&self) -> usize {
        self.outstanding.len()
    }

    /// Returns `true` if the transport is connected.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Returns the target host.
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the target port.
    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a reference to the handler.
    #[inline]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns a mutable reference to the handler.
    #[inline]
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consumes the connection, returning the handler.
    ///
    /// The transport is closed and outstanding responses are discarded.
    pub fn into_handler(mut self) -> H {
        self.close();
        self.handler
    }
}

impl<H, C: Connect> std::fmt::Debug for Connection<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("connected", &self.transport.is_some())
            .field("outstanding", &self.outstanding.len())
            .finish_non_exhaustive()
    }
}
