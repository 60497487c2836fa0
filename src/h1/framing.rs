//! Message body framing.
//!
//! Decided once per response, after the header section ends.
use crate::h1::ProtocolError;
use crate::h1::parser::parse_content_length;
use crate::headers::HeaderMap;
use crate::http::{Method, StatusCode, Version};

/// How the end of a response body is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Framing {
    /// `Transfer-Encoding: chunked`.
    pub chunked: bool,
    /// Known body length, `None` means the body ends when the peer closes the stream.
    ///
    /// Always `None` when chunked.
    pub content_length: Option<u64>,
    /// The peer is expected to close the connection after this response.
    pub will_close: bool,
}

impl Framing {
    /// Decide the framing from the response head.
    pub fn new(
        version: Version,
        status: StatusCode,
        method: &Method,
        headers: &HeaderMap,
    ) -> Result<Framing, ProtocolError> {
        let mut chunked = headers.value_eq_ignore_case("transfer-encoding", "chunked");
        let mut will_close = check_close(version, headers);

        let no_content = status == StatusCode::NO_CONTENT
            || status == StatusCode::NOT_MODIFIED
            || status.is_informational()
            || method.is_head();

        let content_length = if no_content {
            chunked = false;
            Some(0)
        } else if chunked {
            None
        } else {
            match headers.get("content-length") {
                Some(value) => Some(parse_content_length(value)?),
                None => None,
            }
        };

        if !chunked && content_length.is_none() {
            will_close = true;
        }

        Ok(Self { chunked, content_length, will_close })
    }

    /// Returns `true` if the body can only be terminated by the peer closing the stream.
    #[inline]
    pub const fn is_eof_terminated(&self) -> bool {
        !self.chunked && self.content_length.is_none()
    }
}

/// Returns `true` if the peer will close the connection after the response.
///
/// HTTP/1.1 keeps the connection unless `Connection: close` is sent, older versions close it
/// unless a `Keep-Alive` header is present.
fn check_close(version: Version, headers: &HeaderMap) -> bool {
    if version == Version::HTTP_11 {
        headers.value_eq_ignore_case("connection", "close")
    } else {
        !headers.contains_key("keep-alive")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn headers(fields: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in fields {
            map.insert(*name, *value);
        }
        map
    }

    macro_rules! framing {
        ($version:ident, $status:literal, $method:ident, [$($name:literal: $value:literal),*]) => {
            Framing::new(
                Version::$version,
                StatusCode::from_u16($status).unwrap(),
                &Method::$method,
                &headers(&[$(($name, $value)),*]),
            )
        };
    }

    #[test]
    fn length_and_chunked() {
        let f = framing!(HTTP_11, 200, GET, ["content-length": "5"]).unwrap();
        assert_eq!(f, Framing { chunked: false, content_length: Some(5), will_close: false });

        let f = framing!(HTTP_11, 200, GET, ["transfer-encoding": "Chunked", "content-length": "5"]).unwrap();
        assert_eq!(f, Framing { chunked: true, content_length: None, will_close: false });

        let f = framing!(HTTP_11, 200, GET, ["content-length": "five"]);
        assert_eq!(f, Err(ProtocolError::InvalidContentLength));
    }

    #[test]
    fn eof_terminated() {
        let f = framing!(HTTP_11, 200, GET, []).unwrap();
        assert!(f.is_eof_terminated());
        assert!(f.will_close);

        let f = framing!(HTTP_11, 200, GET, ["transfer-encoding": "gzip"]).unwrap();
        assert!(f.is_eof_terminated());
    }

    #[test]
    fn no_content() {
        for status in [100, 101, 199, 204, 304] {
            let f = Framing::new(
                Version::HTTP_11,
                StatusCode::from_u16(status).unwrap(),
                &Method::GET,
                &headers(&[("content-length", "10")]),
            )
            .unwrap();
            assert_eq!(f.content_length, Some(0), "status {status}");
        }

        let f = framing!(HTTP_11, 200, HEAD, ["content-length": "10", "transfer-encoding": "chunked"]).unwrap();
        assert_eq!(f, Framing { chunked: false, content_length: Some(0), will_close: false });

        let f = framing!(HTTP_11, 200, HEAD, ["content-length": "bogus"]).unwrap();
        assert_eq!(f.content_length, Some(0));
    }

    #[test]
    fn will_close() {
        assert!(framing!(HTTP_11, 200, GET, ["content-length": "0", "connection": "Close"]).unwrap().will_close);
        assert!(!framing!(HTTP_11, 200, GET, ["content-length": "0", "connection": "keep-alive"]).unwrap().will_close);
        assert!(framing!(HTTP_10, 200, GET, ["content-length": "0"]).unwrap().will_close);
        assert!(!framing!(HTTP_10, 200, GET, ["content-length": "0", "keep-alive": "timeout=5"]).unwrap().will_close);
    }
}
