//! Byte stream transport.
//!
//! [`Connection`] only needs a connected byte stream with a readiness check. [`Connect`]
//! establishes one lazily, on the first request write. The default implementation uses
//! [`std::net::TcpStream`].
//!
//! [`Connection`]: crate::Connection
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::log::{debug, info};

/// A connected byte stream.
pub trait Transport {
    /// Returns `true` if a [`read`] would not block.
    ///
    /// With `timeout` of `None` this only checks, otherwise it waits up to `timeout` for data.
    /// End of stream counts as readable.
    ///
    /// [`read`]: Transport::read
    fn poll_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool>;

    /// Read available bytes, `Ok(0)` means the peer closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write the whole buffer or fail.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Shut the stream down.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Establish a [`Transport`] to `host:port`.
pub trait Connect {
    /// Connected transport type.
    type Transport: Transport;

    /// Open a connection.
    fn connect(&mut self, host: &str, port: u16, config: &Config) -> io::Result<Self::Transport>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    #[inline]
    fn poll_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        T::poll_readable(self, timeout)
    }

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        T::read(self, buf)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        T::write_all(self, buf)
    }

    #[inline]
    fn close(&mut self) -> io::Result<()> {
        T::close(self)
    }
}

// ===== TCP =====

/// [`Connect`] over TCP, trying every resolved address in order.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpConnector;

impl Connect for TcpConnector {
    type Transport = TcpStream;

    fn connect(&mut self, host: &str, port: u16, config: &Config) -> io::Result<TcpStream> {
        info!("connecting to {host}:{port}");

        let mut last_err = None;

        for addr in (host, port).to_socket_addrs()? {
            let result = match config.get_connect_timeout() {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match result {
                Ok(stream) => {
                    debug!("connected to {addr}");
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(err) => {
                    debug!("connect to {addr} failed: {err}");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
        }))
    }
}

impl Transport for TcpStream {
    fn poll_readable(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        let mut probe = [0u8; 1];

        let result = match timeout.filter(|t| !t.is_zero()) {
            None => {
                self.set_nonblocking(true)?;
                let result = self.peek(&mut probe);
                self.set_nonblocking(false)?;
                result
            }
            Some(timeout) => {
                self.set_read_timeout(Some(timeout))?;
                let result = self.peek(&mut probe);
                self.set_read_timeout(None)?;
                result
            }
        };

        match result {
            Ok(_) => Ok(true),
            Err(err) if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => Ok(false),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(false),
            Err(err) => Err(err),
        }
    }

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Write::write_all(self, buf)?;
        Write::flush(self)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Err(err) if err.kind() != io::ErrorKind::NotConnected => Err(err),
            _ => Ok(()),
        }
    }
}
