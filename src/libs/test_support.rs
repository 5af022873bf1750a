// Test fixtures: a tiny in-process HTTP server and archive builders.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

type Routes = Arc<Mutex<HashMap<String, (u16, Vec<u8>)>>>;
type Hits = Arc<Mutex<HashMap<String, usize>>>;

/// Serves canned responses on `127.0.0.1:<ephemeral>`. Unknown paths get 404.
pub struct HttpFixture {
    base_url: String,
    routes: Routes,
    hits: Hits,
}

impl HttpFixture {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let routes: Routes = Arc::default();
        let hits: Hits = Arc::default();

        let (thread_routes, thread_hits) = (Arc::clone(&routes), Arc::clone(&hits));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, &thread_routes, &thread_hits);
            }
        });

        Self { base_url, routes, hits }
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn route(&self, path: &str, status: u16, body: Vec<u8>) {
        self.routes.lock().unwrap().insert(path.to_string(), (status, body));
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Total number of requests received.
    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

fn serve(mut stream: TcpStream, routes: &Routes, hits: &Hits) {
    let mut reader = BufReader::new(match stream.try_clone() {
        Ok(s) => s,
        Err(_) => return,
    });

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers; requests carry no body.
    let mut line = String::new();
    while reader.read_line(&mut line).map(|n| n > 2).unwrap_or(false) {
        line.clear();
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let (status, body) = routes
        .lock()
        .unwrap()
        .get(&path)
        .cloned()
        .unwrap_or((404, b"not found".to_vec()));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };

    let head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

/// Builds an in-memory `.tar.gz` from `(path, contents, mode)` entries.
pub fn tar_gz(entries: &[(&str, &[u8], u32)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, data, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append_data(&mut header, path, *data).expect("append tar entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

/// Builds an in-memory `.zip` from `(path, contents)` entries.
pub fn zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default().unix_permissions(0o755);
    for (path, data) in entries {
        writer.start_file(*path, options).expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// A stand-in `chrysalis` executable whose `--version` prints `chrysalis <version>`.
pub fn fake_chrysalis(version: &str) -> Vec<u8> {
    format!("#!/bin/sh\necho \"chrysalis {version}\"\n").into_bytes()
}
