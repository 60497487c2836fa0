use crate::config::Limits;
use crate::h1::ProtocolError;
use crate::h1::response::{Handler, Response, State};
use crate::http::{Method, StatusCode, Version};

#[derive(Debug, PartialEq, Eq)]
enum Event {
    Begin(u16),
    Data(Vec<u8>),
    Complete,
}

/// Records events, adjacent data fragments are joined.
#[derive(Debug, Default)]
struct Recorder {
    events: Vec<Event>,
    data_calls: usize,
}

impl Handler for Recorder {
    fn on_begin(&mut self, response: &Response) {
        self.events.push(Event::Begin(response.status().as_u16()));
    }

    fn on_data(&mut self, _: &Response, data: &[u8]) {
        assert!(!data.is_empty());
        self.data_calls += 1;
        match self.events.last_mut() {
            Some(Event::Data(buf)) => buf.extend_from_slice(data),
            _ => self.events.push(Event::Data(data.to_vec())),
        }
    }

    fn on_complete(&mut self, _: &Response) {
        self.events.push(Event::Complete);
    }
}

fn feed_all(method: Method, input: &[u8]) -> (Response, Recorder) {
    let mut res = Response::new(method);
    let mut rec = Recorder::default();
    let used = res.feed(input, &mut rec).unwrap();
    assert_eq!(used, input.len(), "unused bytes");
    (res, rec)
}

fn feed_bytewise(method: Method, input: &[u8]) -> (Response, Recorder) {
    let mut res = Response::new(method);
    let mut rec = Recorder::default();
    for byte in input.chunks(1) {
        assert_eq!(res.feed(byte, &mut rec).unwrap(), 1);
    }
    (res, rec)
}

fn data(bytes: &[u8]) -> Event {
    Event::Data(bytes.to_vec())
}

#[test]
fn test_length_delimited() {
    let input = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nContent-Type: text/plain\r\n\r\nhello";
    let (res, rec) = feed_all(Method::GET, input);

    assert!(res.is_complete());
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.reason(), "OK");
    assert_eq!(res.version(), Version::HTTP_11);
    assert_eq!(res.version().number(), 11);
    assert_eq!(res.http_version(), "HTTP/1.1");
    assert_eq!(res.header("content-type"), Some("text/plain"));
    assert_eq!(res.header("Content-Type"), Some("text/plain"));
    assert_eq!(res.content_length(), Some(5));
    assert_eq!(res.bytes_read(), 5);
    assert!(!res.will_close());
    assert_eq!(rec.events, [Event::Begin(200), data(b"hello"), Event::Complete]);
}

#[test]
fn test_length_any_split() {
    let input = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";

    for split in 1..input.len() {
        let mut res = Response::new(Method::GET);
        let mut rec = Recorder::default();
        let (a, b) = input.split_at(split);
        assert_eq!(res.feed(a, &mut rec).unwrap(), a.len());
        assert_eq!(res.feed(b, &mut rec).unwrap(), b.len());

        assert_eq!(res.bytes_read(), 5, "split at {split}");
        assert_eq!(rec.events, [Event::Begin(200), data(b"hello"), Event::Complete], "split at {split}");
    }
}

#[test]
fn test_bytewise_equals_oneshot() {
    let inputs: [&[u8]; 5] = [
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello",
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n",
        b"HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 201 Created\r\nContent-Length: 2\r\n\r\nok",
        b"HTTP/1.0 204 No Content\r\nKeep-Alive: timeout=5\r\n\r\n",
        b"HTTP/1.1 200 OK\nContent-Length: 3\n\nabc",
    ];

    for input in inputs {
        let (one, one_rec) = feed_all(Method::GET, input);
        let (each, each_rec) = feed_bytewise(Method::GET, input);

        assert_eq!(one_rec.events, each_rec.events);
        assert_eq!(one.bytes_read(), each.bytes_read());
        assert!(one.is_complete() && each.is_complete());
    }
}

#[test]
fn test_chunked() {
    let input = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";
    let (res, rec) = feed_all(Method::GET, input);

    assert!(res.is_chunked());
    assert_eq!(res.content_length(), None);
    assert_eq!(res.bytes_read(), 9);
    assert_eq!(rec.data_calls, 2);
    assert_eq!(rec.events, [Event::Begin(200), data(b"Wikipedia"), Event::Complete]);
}

#[test]
fn test_chunked_extension_and_trailers() {
    let input = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
        a;name=value\r\n0123456789\r\n\
        0\r\nExpires: never\r\nX-Trailer: 1\r\n\r\n";
    let (res, rec) = feed_all(Method::GET, input);

    assert_eq!(res.bytes_read(), 10);
    assert_eq!(res.header("expires"), None);
    assert_eq!(rec.events, [Event::Begin(200), data(b"0123456789"), Event::Complete]);
}

#[test]
fn test_no_content() {
    macro_rules! test {
        ($method:ident, $input:literal) => {
            let (res, rec) = feed_all(Method::$method, $input);
            assert!(res.is_complete());
            assert_eq!(res.bytes_read(), 0);
            assert_eq!(rec.data_calls, 0);
            assert!(matches!(rec.events[..], [Event::Begin(_), Event::Complete]));
        };
    }

    test!(HEAD, b"HTTP/1.1 200 OK\r\nContent-Length: 1024\r\n\r\n");
    test!(HEAD, b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n");
    test!(GET, b"HTTP/1.1 204 No Content\r\nContent-Length: 10\r\n\r\n");
    test!(GET, b"HTTP/1.1 304 Not Modified\r\nContent-Length: 10\r\n\r\n");
    test!(GET, b"HTTP/1.1 101 Switching Protocols\r\nContent-Length: 10\r\n\r\n");
}

#[test]
fn test_leftover_belongs_to_next() {
    let input = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhiHTTP/1.1 404 Not Found\r\n";
    let mut res = Response::new(Method::GET);
    let mut rec = Recorder::default();

    let used = res.feed(input, &mut rec).unwrap();
    assert_eq!(&input[used..], b"HTTP/1.1 404 Not Found\r\n");
    assert!(res.is_complete());

    assert_eq!(res.feed(b"more", &mut rec), Err(ProtocolError::AlreadyComplete));
}

#[test]
fn test_continue() {
    let input = b"HTTP/1.1 100 Continue\r\nX-Interim: 1\r\n\r\nHTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n";
    let (res, rec) = feed_all(Method::POST, input);

    assert_eq!(res.status(), 200);
    assert_eq!(res.header("x-interim"), None);
    assert_eq!(rec.events, [Event::Begin(200), Event::Complete]);
}

#[test]
fn test_folded_header() {
    let input = b"HTTP/1.1 200 OK\r\nX-A: foo\r\n  bar\r\nX-B:\tbaz\r\n\tqux\r\n\r\n";
    let mut res = Response::new(Method::GET);
    res.feed(input, &mut ()).unwrap();

    assert_eq!(res.header("x-a"), Some("foo bar"));
    assert_eq!(res.header("x-b"), Some("baz qux"));
}

#[test]
fn test_duplicate_header() {
    let input = b"HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nSET-COOKIE: b=2\r\nContent-Length: 0\r\n\r\n";
    let (res, _) = feed_all(Method::GET, input);
    assert_eq!(res.header("set-cookie"), Some("b=2"));
}

#[test]
fn test_eof_terminated() {
    let input = b"HTTP/1.0 200 OK\r\n\r\nuntil close";
    let (mut res, mut rec) = feed_all(Method::GET, input);

    assert_eq!(res.state(), State::Body);
    assert!(res.will_close());
    assert_eq!(rec.events, [Event::Begin(200), data(b"until close")]);

    res.notify_closed(&mut rec).unwrap();
    assert!(res.is_complete());
    assert_eq!(rec.events.last(), Some(&Event::Complete));

    // already complete
    res.notify_closed(&mut rec).unwrap();
    assert_eq!(rec.events.len(), 3);
}

#[test]
fn test_unexpected_close() {
    macro_rules! test {
        ($input:literal, $state:ident) => {
            let mut res = Response::new(Method::GET);
            let mut rec = Recorder::default();
            res.feed($input, &mut rec).unwrap();
            assert_eq!(
                res.notify_closed(&mut rec),
                Err(ProtocolError::UnexpectedConnectionClose(State::$state))
            );
            assert!(!rec.events.contains(&Event::Complete));
        };
    }

    test!(b"HTTP/1.1 200", StatusLine);
    test!(b"HTTP/1.1 200 OK\r\nContent-Le", Headers);
    test!(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhel", Body);
    test!(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nped", Body);
    test!(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\npedia", ChunkEnd);
    test!(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n", ChunkLen);
    test!(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n0\r\n", Trailers);

    let mut res = Response::new(Method::GET);
    assert!(res.notify_closed(&mut ()).is_err());
}

#[test]
fn test_status_line() {
    for status in [100u16, 200, 404, 599, 999] {
        let mut input = format!("HTTP/1.1 {status} Some Reason Phrase\r\n").into_bytes();
        if status == 100 {
            input.extend_from_slice(b"\r\n");
        }
        let mut res = Response::new(Method::GET);
        res.feed(&input, &mut ()).unwrap();

        if status == 100 {
            assert_eq!(res.state(), State::StatusLine);
            assert!(res.status_line().is_none());
        } else {
            assert_eq!(res.status(), status);
            assert_eq!(res.reason(), "Some Reason Phrase");
            assert_eq!(res.version().number(), 11);
        }
    }
}

#[test]
fn test_bad_status_line() {
    macro_rules! test {
        ($input:literal, $err:pat) => {
            let mut res = Response::new(Method::GET);
            let err = res.feed($input, &mut ()).unwrap_err();
            assert!(matches!(err, $err), "{err:?}");
        };
    }

    test!(b"HTTP/1.1 99 Too Low\r\n", ProtocolError::BadStatusLine(_));
    test!(b"HTTP/1.1 1000 Too High\r\n", ProtocolError::BadStatusLine(_));
    test!(b"HTTP/1.1 OK\r\n", ProtocolError::BadStatusLine(_));
    test!(b"\r\n", ProtocolError::BadStatusLine(_));
    test!(b"HTTP/2.0 200 OK\r\n", ProtocolError::UnknownProtocol(_));
    test!(b"ICY 200 OK\r\n", ProtocolError::UnknownProtocol(_));
    test!(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n", ProtocolError::InvalidChunkSize);
    test!(b"HTTP/1.1 200 OK\r\nContent-Length: -1\r\n\r\n", ProtocolError::InvalidContentLength);
}

#[test]
fn test_limits() {
    let limits = Limits { max_line_len: 16, max_headers: 2 };

    let mut res = Response::with_limits(Method::GET, limits);
    let err = res.feed(b"HTTP/1.1 200 A Very Long Reason\r\n", &mut ()).unwrap_err();
    assert_eq!(err, ProtocolError::LineTooLong);

    let mut res = Response::with_limits(Method::GET, limits);
    let err = res.feed(b"HTTP/1.1 200 OK\r\nA: 1\r\nB: 2\r\nC: 3\r\n\r\n", &mut ()).unwrap_err();
    assert_eq!(err, ProtocolError::TooManyHeaders);
}

#[test]
#[should_panic = "status line"]
fn test_status_before_status_line() {
    let res = Response::new(Method::GET);
    res.status();
}
