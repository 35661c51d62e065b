//! Minimal HTTP/1.1 server emulating the image generation API for integration tests.
//!
//! `POST /images/generations` answers according to [`Mode`]; a successful
//! answer points at `GET /img/<n>.png` on the same server, which serves
//! [`PNG_BYTES`]. Any other GET returns 404.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// PNG signature followed by filler; the client never decodes it.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 200 with one image URL.
    Ok,
    /// 200 with an image URL that 404s.
    BrokenImageUrl,
    /// 400 with `{"error": {"message": ...}}`.
    ApiError,
    /// 500 with an HTML body.
    ServerError,
    /// 200 with an empty `data` array.
    EmptyData,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

pub struct ImageServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ImageServer {
    pub fn endpoint(&self) -> String {
        format!("{}images/generations", self.base_url)
    }

    pub fn posts(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == "POST")
            .cloned()
            .collect()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(mode: Mode) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{}/", port);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let counter = Arc::new(Mutex::new(0u32));

    let base = base_url.clone();
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let base = base.clone();
            let log = Arc::clone(&log);
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, mode, &base, &log, &counter));
        }
    });

    ImageServer { base_url, requests }
}

/// A URL on a port nothing listens on.
pub fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/images/generations", port)
}

fn handle(
    mut stream: TcpStream,
    mode: Mode,
    base: &str,
    log: &Mutex<Vec<RecordedRequest>>,
    counter: &Mutex<u32>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    log.lock().unwrap().push(req.clone());

    if req.method == "POST" && req.path == "/images/generations" {
        let n = {
            let mut c = counter.lock().unwrap();
            *c += 1;
            *c
        };
        let (status, body) = match mode {
            Mode::Ok => (
                "200 OK",
                format!(r#"{{"created": 1, "data": [{{"url": "{}img/{}.png"}}]}}"#, base, n),
            ),
            Mode::BrokenImageUrl => (
                "200 OK",
                format!(r#"{{"created": 1, "data": [{{"url": "{}missing.png"}}]}}"#, base),
            ),
            Mode::ApiError => (
                "400 Bad Request",
                r#"{"error": {"message": "prompt rejected by safety filter", "code": "1301"}}"#
                    .to_string(),
            ),
            Mode::ServerError => (
                "500 Internal Server Error",
                "<html>oops</html>".to_string(),
            ),
            Mode::EmptyData => ("200 OK", r#"{"created": 1, "data": []}"#.to_string()),
        };
        respond(&mut stream, status, "application/json", body.as_bytes());
        return;
    }

    if req.method == "GET" && req.path.starts_with("/img/") {
        respond(&mut stream, "200 OK", "image/png", PNG_BYTES);
        return;
    }

    respond(&mut stream, "404 Not Found", "text/plain", b"not found");
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

/// Reads headers, then `Content-Length` bytes of body.
fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();

    let mut content_length = 0usize;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).into_owned();

    Some(RecordedRequest {
        method,
        path,
        authorization,
        body,
    })
}
