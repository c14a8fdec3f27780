use crate::error::Result;
use crate::fetcher::session::{Response, Session, DEFAULT_ENCODING};
use scraper::Html;

/// GET a page and force its text encoding to UTF-8.
pub fn fetch(session: &Session, url: &str) -> Result<Response> {
    fetch_with_encoding(session, url, DEFAULT_ENCODING)
}

/// GET a page and force its text encoding to the given label. Exactly
/// one request attempt; transport failures surface as
/// `ConnectionFailure` with the URL attached.
pub fn fetch_with_encoding(session: &Session, url: &str, encoding: &str) -> Result<Response> {
    session.get(url, encoding)
}

/// Fetch a page and parse its body into a queryable document tree.
/// Connection failures propagate unchanged; nothing is parsed on failure.
pub fn parse(session: &Session, url: &str) -> Result<Html> {
    let response = fetch(session, url)?;
    Ok(Html::parse_document(&response.text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use scraper::Selector;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    /// Serve `body` once per connection on an ephemeral local port,
    /// counting requests. Returns the base URL and the counter.
    fn serve(body: &'static str, content_type: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                hits_clone.fetch_add(1, Ordering::SeqCst);

                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    content_type,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (format!("http://{}/", addr), hits)
    }

    fn offline_session() -> (Session, TempDir) {
        let temp = TempDir::new().unwrap();
        let config = HttpConfig {
            timeout: 2,
            use_cache: false,
            ..HttpConfig::default()
        };
        let session = Session::new(&config, temp.path().to_path_buf()).unwrap();
        (session, temp)
    }

    #[test]
    fn test_fetch_is_a_single_attempt() {
        let (url, hits) = serve("<html><body>ok</body></html>", "text/html");
        let (session, _temp) = offline_session();

        let response = fetch(&session, &url).unwrap();
        assert_eq!(response.url(), url);
        assert_eq!(response.encoding(), DEFAULT_ENCODING);
        assert!(response.text().contains("ok"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fetch_overrides_server_declared_charset() {
        // Server claims latin-1; the caller forces utf-8 and that is
        // what the response reports and decodes with.
        let (url, _hits) = serve("<p>caf\u{c3}\u{a9}</p>", "text/html; charset=iso-8859-1");
        let (session, _temp) = offline_session();

        let response = fetch_with_encoding(&session, &url, "utf-8").unwrap();
        assert_eq!(response.encoding(), "utf-8");
    }

    #[test]
    fn test_parse_produces_queryable_tree() {
        let (url, _hits) = serve("<html><body><h1>Title</h1></body></html>", "text/html");
        let (session, _temp) = offline_session();

        let document = parse(&session, &url).unwrap();
        let selector = Selector::parse("h1").unwrap();
        let heading = document.select(&selector).next().unwrap();
        assert_eq!(heading.text().collect::<String>(), "Title");
    }

    #[test]
    fn test_parse_propagates_connection_failure() {
        let (session, _temp) = offline_session();
        let result = parse(&session, "http://127.0.0.1:1/");
        assert!(matches!(
            result,
            Err(crate::error::ScrapeError::ConnectionFailure { .. })
        ));
    }
}
