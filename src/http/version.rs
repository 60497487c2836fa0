/// HTTP Version.
///
/// Only the HTTP/1.x versions that can appear in a response status line are representable.
///
/// [httpwg](https://httpwg.org/specs/rfc9112.html#http.version)
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Version(Inner);

#[derive(PartialEq, PartialOrd, Copy, Clone, Eq, Ord, Hash)]
enum Inner {
    Http10,
    Http11,
}

const VERSION_SIZE: usize = b"HTTP/1.1".len();

impl Version {
    /// `HTTP/1.0`
    pub const HTTP_10: Version = Version(Inner::Http10);

    /// `HTTP/1.1`
    pub const HTTP_11: Version = Version(Inner::Http11);

    /// Recognize a version tag.
    ///
    /// Only the leading 8 bytes are compared, so `HTTP/1.1x` is still `HTTP/1.1`.
    pub fn from_tag(tag: &str) -> Option<Version> {
        match tag.as_bytes().first_chunk::<VERSION_SIZE>()? {
            b"HTTP/1.0" => Some(Self::HTTP_10),
            b"HTTP/1.1" => Some(Self::HTTP_11),
            _ => None,
        }
    }

    /// Returns the version as a two digit number, `10` or `11`.
    #[inline]
    pub const fn number(&self) -> u8 {
        match self.0 {
            Inner::Http10 => 10,
            Inner::Http11 => 11,
        }
    }

    /// Returns string representation of HTTP version, e.g: `HTTP/1.1`
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self.0 {
            Inner::Http10 => "HTTP/1.0",
            Inner::Http11 => "HTTP/1.1",
        }
    }
}

impl Default for Version {
    #[inline]
    fn default() -> Version {
        Version::HTTP_11
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}
