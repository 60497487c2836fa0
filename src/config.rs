//! Connection tunables.
use std::time::Duration;

/// Bytes requested from the transport per [`pump`] call.
///
/// [`pump`]: crate::Connection::pump
pub const DEFAULT_READ_BUFFER: usize = 2048;

/// Longest status, header, chunk size or trailer line accepted, excluding the line terminator.
pub const DEFAULT_MAX_LINE: usize = 8 * 1024;

/// Most header fields accepted per response.
pub const DEFAULT_MAX_HEADERS: usize = 100;

/// What to do with bytes the peer sends while no response is outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Unsolicited {
    /// Close the connection and return [`ErrorKind::UnsolicitedData`].
    ///
    /// [`ErrorKind::UnsolicitedData`]: crate::ErrorKind::UnsolicitedData
    #[default]
    Error,
    /// Drop the bytes and keep the connection.
    Discard,
}

/// [`Connection`] configuration.
///
/// ```
/// use std::time::Duration;
/// use h1pipe::Config;
///
/// let config = Config::new()
///     .read_buffer_size(4096)
///     .poll_timeout(Some(Duration::from_millis(10)));
/// assert_eq!(config.get_read_buffer_size(), 4096);
/// ```
///
/// [`Connection`]: crate::Connection
#[derive(Clone, Debug)]
pub struct Config {
    read_buffer_size: usize,
    poll_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_line_len: usize,
    max_headers: usize,
    unsolicited: Unsolicited,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create [`Config`] with default values.
    pub const fn new() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER,
            poll_timeout: None,
            connect_timeout: None,
            max_line_len: DEFAULT_MAX_LINE,
            max_headers: DEFAULT_MAX_HEADERS,
            unsolicited: Unsolicited::Error,
        }
    }

    /// Bytes read from the transport per pump, clamped to at least 1.
    pub const fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = if size == 0 { 1 } else { size };
        self
    }

    /// How long a pump waits for the transport to become readable.
    ///
    /// `None` checks readiness without waiting.
    pub const fn poll_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Timeout for establishing the transport, `None` uses the system default.
    pub const fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Longest accepted line.
    pub const fn max_line_len(mut self, len: usize) -> Self {
        self.max_line_len = len;
        self
    }

    /// Most accepted header fields per response.
    pub const fn max_headers(mut self, count: usize) -> Self {
        self.max_headers = count;
        self
    }

    /// Policy for bytes received while no response is outstanding.
    pub const fn unsolicited(mut self, policy: Unsolicited) -> Self {
        self.unsolicited = policy;
        self
    }

    pub const fn get_read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    pub const fn get_poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout
    }

    pub const fn get_connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    pub const fn get_max_line_len(&self) -> usize {
        self.max_line_len
    }

    pub const fn get_max_headers(&self) -> usize {
        self.max_headers
    }

    pub const fn get_unsolicited(&self) -> Unsolicited {
        self.unsolicited
    }

    pub(crate) const fn limits(&self) -> Limits {
        Limits {
            max_line_len: self.max_line_len,
            max_headers: self.max_headers,
        }
    }
}

/// Per response parsing limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Longest accepted line.
    pub max_line_len: usize,
    /// Most accepted header fields.
    pub max_headers: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Config::new().limits()
    }
}
