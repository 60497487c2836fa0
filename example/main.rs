//! Pipeline GET requests for every given path on one connection.
//!
//! ```not_rust
//! RUST_LOG=h1pipe=debug cargo run --bin fetch -- example.com / /about
//! ```
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use h1pipe::{Config, Connection, Handler, Response};

struct Print {
    stdout: io::Stdout,
    received: u64,
}

impl Handler for Print {
    fn on_begin(&mut self, res: &Response) {
        eprintln!("> {} {} {}", res.http_version(), res.status().as_u16(), res.reason());
        for (name, value) in res.headers() {
            eprintln!("> {name}: {value}");
        }
        self.received = 0;
    }

    fn on_data(&mut self, _: &Response, data: &[u8]) {
        if let Err(err) = self.stdout.write_all(data) {
            log::error!("stdout: {err}");
        }
        self.received += data.len() as u64;
    }

    fn on_complete(&mut self, res: &Response) {
        let _ = self.stdout.flush();
        eprintln!("> {} {}: {} bytes", res.method(), res.status(), self.received);
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(authority) = args.next() else {
        eprintln!("usage: fetch <host[:port] | [ipv6]:port> [path...]");
        return ExitCode::FAILURE;
    };

    let Some((host, port)) = parse_authority(&authority) else {
        eprintln!("invalid authority: {authority}");
        return ExitCode::FAILURE;
    };

    let mut paths = args.collect::<Vec<_>>();
    if paths.is_empty() {
        paths.push("/".to_owned());
    }

    let config = Config::new()
        .poll_timeout(Some(Duration::from_millis(100)))
        .connect_timeout(Some(Duration::from_secs(5)));

    let mut conn = Connection::new(host, port)
        .with_config(config)
        .with_handler(Print { stdout: io::stdout(), received: 0 });

    match run(&mut conn, &paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Split `host[:port]`, ipv6 literals are accepted bare or as `[addr]:port`.
fn parse_authority(authority: &str) -> Option<(String, u16)> {
    if let Some(rest) = authority.strip_prefix('[') {
        let (host, rest) = rest.split_once(']')?;
        let port = match rest.strip_prefix(':') {
            Some(port) => port.parse().ok()?,
            None if rest.is_empty() => 80,
            None => return None,
        };
        return Some((host.to_owned(), port));
    }

    match authority.split_once(':') {
        // more than one colon is a bare ipv6 literal
        Some((host, port)) if !port.contains(':') => Some((host.to_owned(), port.parse().ok()?)),
        _ => Some((authority.to_owned(), 80)),
    }
}

fn run(conn: &mut Connection<Print>, paths: &[String]) -> Result<(), h1pipe::Error> {
    for path in paths {
        conn.request("GET", path, &[("User-Agent", "h1pipe-fetch")], None)?;
    }

    while conn.outstanding() {
        conn.pump()?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::parse_authority;

    #[test]
    fn test_parse_authority() {
        assert_eq!(parse_authority("example.com"), Some(("example.com".into(), 80)));
        assert_eq!(parse_authority("127.0.0.1:8080"), Some(("127.0.0.1".into(), 8080)));
        assert_eq!(parse_authority("::1"), Some(("::1".into(), 80)));
        assert_eq!(parse_authority("[::1]"), Some(("::1".into(), 80)));
        assert_eq!(parse_authority("[::1]:8080"), Some(("::1".into(), 8080)));
        assert_eq!(parse_authority("[::1]8080"), None);
        assert_eq!(parse_authority("host:port"), None);
    }
}
