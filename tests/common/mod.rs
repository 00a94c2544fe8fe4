#![allow(dead_code)]

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Request lines received by a fake upstream, e.g.
/// `GET /api/data-fetch?studentId=1&... HTTP/1.1`.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

fn read_request_line(stream: &TcpStream) -> Option<String> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;

    // Drain headers; the fake never needs a body.
    let mut line = String::new();
    while reader.read_line(&mut line).ok()? > 0 {
        if line == "\r\n" || line == "\n" {
            break;
        }
        line.clear();
    }
    Some(request_line.trim_end().to_string())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

/// Serve `body` with `status` to every request. Returns the endpoint URL
/// and the log of request lines.
pub fn start_json_server(status: u16, body: &str) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let body = body.to_string();

    let requests = Arc::clone(&log);
    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            if let Some(line) = read_request_line(&stream) {
                requests.lock().unwrap().push(line);
            }
            let response = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    (format!("http://{addr}/api/data-fetch"), log)
}

/// Streams `size` bytes of JSON-looking padding without a Content-Length,
/// so the client cannot tell the size up front.
pub fn start_streaming_server(size: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");

    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            let _ = read_request_line(&stream);
            let header = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n";
            if stream.write_all(header.as_bytes()).is_err() {
                continue;
            }
            let chunk = vec![b' '; 64 * 1024];
            let mut sent = 0;
            while sent < size {
                if stream.write_all(&chunk).is_err() {
                    break;
                }
                sent += chunk.len();
            }
        }
    });

    format!("http://{addr}/api/data-fetch")
}

/// Accepts connections but never responds.
pub fn start_hanging_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");

    thread::spawn(move || {
        for _stream in listener.incoming().flatten() {
            thread::sleep(Duration::from_secs(60));
        }
    });

    format!("http://{addr}/api/data-fetch")
}

/// Closes every connection immediately.
pub fn start_refusing_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            drop(stream);
        }
    });

    format!("http://{addr}/api/data-fetch")
}

/// Answers with bytes that are not HTTP.
pub fn start_corrupt_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");

    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            let _ = read_request_line(&stream);
            let _ = stream.write_all(b"GARBAGE\r\n\r\nNOT HTTP");
            let _ = stream.flush();
        }
    });

    format!("http://{addr}/api/data-fetch")
}

/// Write a config file pointing at `api_url` with the cache kept inside
/// `dir`.
pub fn write_config(dir: &Path, api_url: &str) -> PathBuf {
    let path = dir.join("config.json");
    let config = serde_json::json!({
        "api_url": api_url,
        "timeout_secs": 5,
        "cache_dir": dir.join("cache"),
    });
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}
