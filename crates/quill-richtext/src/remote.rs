//! HTTP highlighting backend.
//!
//! Talks to a highlighting service that accepts
//! `POST {url}/highlight` with a JSON body `{"code", "lang", "theme"}` and
//! answers with the rendered HTML as the response body.
//!
//! Status mapping:
//! - 2xx: body is the markup
//! - 400, 404, 422: the service does not know the language
//! - anything else, transport errors and timeouts: service unavailable

use std::time::Duration;

use serde::Serialize;
use ureq::Agent;

use crate::consts::DEFAULT_TIMEOUT;
use crate::highlight::{HighlightError, SyntaxHighlighter};

/// Request body sent to the highlighting service.
#[derive(Debug, Serialize)]
struct HighlightRequest<'a> {
    code: &'a str,
    lang: &'a str,
    theme: &'a str,
}

/// Create HTTP agent with the specified timeout.
///
/// Non-2xx statuses are returned as responses so the body can be inspected.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`SyntaxHighlighter`] delegating to a highlighting service over HTTP.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use quill_richtext::{Highlighter, RemoteHighlighter};
///
/// let backend = RemoteHighlighter::new("http://127.0.0.1:4000")
///     .timeout(Duration::from_secs(5));
/// let highlighter = Highlighter::new(backend).theme("github-dark");
/// ```
pub struct RemoteHighlighter {
    url: String,
    agent: Agent,
}

impl RemoteHighlighter {
    /// Create a backend for the service at `url` with the default timeout.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_owned(),
            agent: create_agent(DEFAULT_TIMEOUT),
        }
    }

    /// Set the global request timeout.
    ///
    /// Default is 10 seconds. A request exceeding it counts as a failure.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Service base URL (without trailing slash).
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SyntaxHighlighter for RemoteHighlighter {
    fn render(&self, code: &str, lang: &str, theme: &str) -> Result<String, HighlightError> {
        let endpoint = format!("{}/highlight", self.url);
        let response = self
            .agent
            .post(&endpoint)
            .send_json(HighlightRequest { code, lang, theme })
            .map_err(|e| HighlightError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        match status {
            200..=299 => body
                .read_to_string()
                .map_err(|e| HighlightError::Unavailable(format!("unreadable response: {e}"))),
            400 | 404 | 422 => Err(HighlightError::UnsupportedLanguage(lang.to_owned())),
            _ => {
                let error_body = body
                    .read_to_string()
                    .unwrap_or_else(|_| String::from("(unable to read error body)"));
                Err(HighlightError::Unavailable(format!(
                    "HTTP {status}: {error_body}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use super::*;
    use crate::consts::HIGHLIGHT_BUCKET;
    use crate::highlight::{Highlighter, fallback_html};
    use pretty_assertions::assert_eq;
    use quill_cache::{Cache, MemoryCache};

    /// Read an HTTP/1.1 request body, sized or chunked.
    fn read_body(reader: &mut impl BufRead, content_length: usize, chunked: bool) -> Vec<u8> {
        if !chunked {
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();
            return body;
        }
        let mut body = Vec::new();
        loop {
            let mut size_line = String::new();
            reader.read_line(&mut size_line).unwrap();
            let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).unwrap();
            if size == 0 {
                return body;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    }

    /// Serve a single request with `status` and `body`.
    ///
    /// Returns the base URL and a receiver yielding the request line and body.
    fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            let mut chunked = false;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    let value = value.trim();
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.parse().unwrap();
                    } else if name.eq_ignore_ascii_case("transfer-encoding") {
                        chunked = value.eq_ignore_ascii_case("chunked");
                    }
                }
            }
            let request_body = read_body(&mut reader, content_length, chunked);

            write!(
                stream,
                "HTTP/1.1 {status} Stub\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();

            let _ = tx.send((
                request_line.trim_end().to_owned(),
                String::from_utf8(request_body).unwrap(),
            ));
        });

        (url, rx)
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = RemoteHighlighter::new("http://localhost:4000/");
        assert_eq!(backend.url(), "http://localhost:4000");
    }

    #[test]
    fn test_success_body_is_markup() {
        let (url, request) = serve_once(200, "<pre>ok</pre>");
        let backend = RemoteHighlighter::new(format!("{url}/"));

        let html = backend.render("fn a() {}", "rust", "dark").unwrap();
        assert_eq!(html, "<pre>ok</pre>");

        let (line, body) = request.recv().unwrap();
        assert!(line.starts_with("POST /highlight "), "unexpected request line: {line}");
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "code": "fn a() {}", "lang": "rust", "theme": "dark" })
        );
    }

    #[test]
    fn test_client_error_statuses_are_unsupported_language() {
        for status in [400, 404, 422] {
            let (url, _request) = serve_once(status, "no such lexer");
            let err = RemoteHighlighter::new(url)
                .render("x", "brainfork", "dark")
                .unwrap_err();
            assert!(
                matches!(&err, HighlightError::UnsupportedLanguage(lang) if lang == "brainfork"),
                "status {status} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_server_error_is_unavailable() {
        let (url, _request) = serve_once(503, "overloaded");
        let err = RemoteHighlighter::new(url).render("x", "rust", "dark").unwrap_err();

        let HighlightError::Unavailable(message) = &err else {
            panic!("expected unavailable, got {err:?}");
        };
        assert!(message.contains("503"));
        assert!(message.contains("overloaded"));
    }

    #[test]
    fn test_unknown_language_falls_back_uncached() {
        let (url, _request) = serve_once(404, "");
        let cache = MemoryCache::new();
        let highlighter =
            Highlighter::new(RemoteHighlighter::new(url)).with_cache(cache.bucket(HIGHLIGHT_BUCKET));

        let html = highlighter.highlight("a < b", "brainfork");

        assert_eq!(html, fallback_html("a < b"));
        assert!(cache.bucket(HIGHLIGHT_BUCKET).is_empty());
    }

    #[test]
    fn test_unreachable_service_is_unavailable() {
        // Port 1 on loopback refuses connections
        let backend = RemoteHighlighter::new("http://127.0.0.1:1").timeout(Duration::from_secs(2));
        let err = backend.render("fn a() {}", "rust", "dark").unwrap_err();
        assert!(matches!(err, HighlightError::Unavailable(_)));
    }
}
