//! Minimal HTTP/1.1 server replaying a script of responses for integration tests.
//!
//! Each GET consumes the next scripted response; once the script runs out
//! the last response repeats. Every request is counted and served on its
//! own thread, so a stalled reply does not hold up the next attempt.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    /// Wait before answering.
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: b"error".to_vec(),
            delay: Duration::ZERO,
        }
    }

    /// A 200 that only starts after `delay`.
    pub fn stalled(delay: Duration, body: &[u8]) -> Self {
        Self {
            delay,
            ..Self::ok(body)
        }
    }
}

pub struct PdfServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl PdfServer {
    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn pdf_url(&self, name: &str) -> String {
        format!("{}{}", self.url, name)
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(script: Vec<Reply>) -> PdfServer {
    assert!(!script.is_empty(), "script needs at least one reply");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let script = Arc::new(Mutex::new(script));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = server_hits.fetch_add(1, Ordering::SeqCst);
            let reply = {
                let script = script.lock().unwrap();
                script[n.min(script.len() - 1)].clone()
            };
            thread::spawn(move || handle(stream, &reply));
        }
    });
    PdfServer {
        url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, reply: &Reply) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    thread::sleep(reply.delay);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&reply.body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
