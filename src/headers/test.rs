use crate::headers::{HeaderMap, IntoHeaderValue};

const fn is_send_sync<T: Send + Sync>() { }
const _: () = {
    is_send_sync::<HeaderMap>();
};

#[test]
fn header_map() {
    let mut map = HeaderMap::new();

    assert!(map.insert("Content-Type", "text/html").is_none());
    assert!(map.contains_key("content-type"));
    assert!(map.contains_key("CONTENT-TYPE"));
    assert_eq!(map.get("Content-Type"), Some("text/html"));

    // Last write wins

    assert_eq!(map.insert("content-type", "text/plain").as_deref(), Some("text/html"));
    assert_eq!(map.get("content-type"), Some("text/plain"));
    assert_eq!(map.len(), 1);

    assert!(map.insert("transfer-encoding", "Chunked").is_none());
    assert!(map.value_eq_ignore_case("Transfer-Encoding", "chunked"));
    assert!(!map.value_eq_ignore_case("connection", "close"));

    let mut names = map.iter().map(|(name, _)| name).collect::<Vec<_>>();
    names.sort_unstable();
    assert_eq!(names, ["content-type", "transfer-encoding"]);

    // Remove

    assert_eq!(map.remove("Content-Type").as_deref(), Some("text/plain"));
    assert!(!map.contains_key("content-type"));

    map.clear();
    assert!(map.is_empty());
}

#[test]
fn header_value() {
    macro_rules! test {
        ($value:expr, $expected:literal) => {
            let mut buf = String::new();
            $value.write_value(&mut buf);
            assert_eq!(buf, $expected);
        };
    }

    test!("identity", "identity");
    test!(String::from("close"), "close");
    test!(1224u64, "1224");
    test!(-1i32, "-1");
    test!(0usize, "0");
}
