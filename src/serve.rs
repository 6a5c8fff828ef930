//! Local preview server for a built site directory.
//!
//! A deliberately small HTTP/1.1 subset: sequential accept loop, one request
//! per connection, `Connection: close` on every response. GET and HEAD only.
//! Responses always carry `Content-Length` and `Cache-Control: no-cache` so
//! a rebuilt site shows up on the next refresh.
//!
//! Request targets are validated strictly before touching the filesystem:
//! malformed percent-escapes are rejected outright, and any target
//! containing `..` (before or after decoding) is refused. Unknown paths map
//! to files inside the served root only.

use std::fs::File;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scan;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("no site to serve: {0} not found (run `bookforge build` first)")]
    MissingIndex(PathBuf),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
}

/// A bound preview server rooted at one site directory.
pub struct PreviewServer {
    listener: TcpListener,
    root: PathBuf,
}

impl PreviewServer {
    /// Bind to `host:port` after checking the site has an `index.html`.
    /// Binding port 0 picks an ephemeral port, useful in tests.
    pub fn bind(root: &Path, host: &str, port: u16) -> Result<Self, ServeError> {
        let index = root.join("index.html");
        if !index.is_file() {
            return Err(ServeError::MissingIndex(index));
        }
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&addr).map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;
        Ok(Self {
            listener,
            root: root.to_path_buf(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve forever, one connection at a time. Per-connection errors are
    /// logged and do not stop the loop.
    pub fn run(&self) -> ! {
        loop {
            match self.listener.accept() {
                Ok((stream, _peer)) => {
                    if let Err(e) = handle_client(stream, &self.root) {
                        eprintln!("[serve] warning: connection error: {e}");
                    }
                }
                Err(e) => eprintln!("[serve] warning: accept failed: {e}"),
            }
        }
    }

    /// Test hook: handle exactly one connection.
    #[cfg(test)]
    fn serve_one(&self) -> io::Result<()> {
        let (stream, _peer) = self.listener.accept()?;
        handle_client(stream, &self.root)
    }
}

fn handle_client(mut stream: TcpStream, root: &Path) -> io::Result<()> {
    let mut buf = [0u8; 4096];
    let n = stream.read(&mut buf)?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let mut parts = request.split_whitespace();
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return respond_simple(&mut stream, 400, "Bad Request");
    };
    if method != "GET" && method != "HEAD" {
        return respond_simple(&mut stream, 405, "Method Not Allowed");
    }
    let head_only = method == "HEAD";

    let target = target.split('?').next().unwrap_or(target);
    if target.contains("..") {
        return respond_simple(&mut stream, 400, "Bad Request");
    }
    let Some(decoded) = percent_decode(target) else {
        return respond_simple(&mut stream, 400, "Bad Request");
    };
    if decoded.contains("..") {
        return respond_simple(&mut stream, 400, "Bad Request");
    }

    let rel = if decoded == "/" {
        "index.html".to_string()
    } else {
        decoded.trim_start_matches('/').to_string()
    };
    let path = root.join(scan::to_native(&rel));
    if !path.is_file() {
        return respond_simple(&mut stream, 404, "Not Found");
    }

    let mut file = File::open(&path)?;
    let length = file.metadata()?.len();
    let mime = content_type_for(&path);
    write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: {mime}\r\nContent-Length: {length}\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n"
    )?;
    if !head_only {
        io::copy(&mut file, &mut stream)?;
    }
    stream.flush()
}

fn respond_simple(stream: &mut TcpStream, code: u16, reason: &str) -> io::Result<()> {
    let body = format!("{code} {reason}\n");
    write!(
        stream,
        "HTTP/1.1 {code} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}

/// Strict percent-decoding: every `%` must be followed by exactly two hex
/// digits, and the decoded bytes must be valid UTF-8. Anything else is
/// rejected with `None` rather than passed through.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "txt" | "md" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn site() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("site");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("index.html"), "<!DOCTYPE html><h1>hi</h1>").unwrap();
        fs::write(root.join("cover.svg"), "<svg/>").unwrap();
        (tmp, root)
    }

    fn request(server: &Arc<PreviewServer>, raw: &str) -> String {
        let addr = server.local_addr().unwrap();
        let handle = {
            let server = Arc::clone(server);
            std::thread::spawn(move || server.serve_one().unwrap())
        };
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(raw.as_bytes()).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        handle.join().unwrap();
        response
    }

    fn bound(root: &Path) -> Arc<PreviewServer> {
        Arc::new(PreviewServer::bind(root, "127.0.0.1", 0).unwrap())
    }

    #[test]
    fn bind_requires_index() {
        let tmp = TempDir::new().unwrap();
        let err = PreviewServer::bind(tmp.path(), "127.0.0.1", 0);
        assert!(matches!(err, Err(ServeError::MissingIndex(_))));
    }

    #[test]
    fn root_serves_index_with_length() {
        let (_tmp, root) = site();
        let server = bound(&root);
        let response = request(&server, "GET / HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Type: text/html; charset=utf-8"));
        let body_len = fs::metadata(root.join("index.html")).unwrap().len();
        assert!(response.contains(&format!("Content-Length: {body_len}")));
        assert!(response.ends_with("<h1>hi</h1>"));
    }

    #[test]
    fn head_omits_body() {
        let (_tmp, root) = site();
        let server = bound(&root);
        let response = request(&server, "HEAD /cover.svg HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Type: image/svg+xml"));
        assert!(response.ends_with("\r\n\r\n"));
    }

    #[test]
    fn unknown_path_is_404() {
        let (_tmp, root) = site();
        let server = bound(&root);
        let response = request(&server, "GET /nope.html HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn non_get_is_405() {
        let (_tmp, root) = site();
        let server = bound(&root);
        let response = request(&server, "POST / HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
    }

    #[test]
    fn raw_traversal_is_rejected() {
        let (_tmp, root) = site();
        let server = bound(&root);
        let response = request(&server, "GET /../book.toml HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn encoded_traversal_is_rejected() {
        let (_tmp, root) = site();
        let server = bound(&root);
        let response = request(&server, "GET /%2e%2e/book.toml HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn malformed_escape_is_rejected() {
        let (_tmp, root) = site();
        let server = bound(&root);
        let response = request(&server, "GET /%zz HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn query_string_is_ignored() {
        let (_tmp, root) = site();
        let server = bound(&root);
        let response = request(&server, "GET /?cache=1 HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn decoding_is_strict() {
        assert_eq!(percent_decode("/a%20b"), Some("/a b".to_string()));
        assert_eq!(percent_decode("/plain"), Some("/plain".to_string()));
        assert_eq!(percent_decode("/bad%2"), None);
        assert_eq!(percent_decode("/bad%"), None);
        assert_eq!(percent_decode("/bad%gg"), None);
        // decodes to invalid UTF-8
        assert_eq!(percent_decode("/%ff%fe"), None);
    }
}
