#![cfg(feature = "server")]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;

use image::{Rgb, RgbImage};
use pixtweak::{OutputFormat, ServerConfig, decode_bytes, encode_image};

const BOUNDARY: &str = "pixtweak-test-boundary";

struct Reply {
    status: u16,
    head: String,
    body: Vec<u8>,
}

fn start_server() -> (SocketAddr, tempfile::TempDir) {
    start_server_with(|_| {})
}

fn start_server_with(adjust: impl FnOnce(&mut ServerConfig)) -> (SocketAddr, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ServerConfig {
        port: 0,
        upload_dir: dir.path().join("uploads"),
        workers: 2,
        ..Default::default()
    };
    adjust(&mut config);
    let server = pixtweak::server::bind(config).unwrap();
    let addr = server.addr();
    thread::spawn(move || server.run());
    (addr, dir)
}

fn send(addr: SocketAddr, method: &str, path: &str, content_type: Option<&str>, body: &[u8]) -> Reply {
    let mut request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    if let Some(ct) = content_type {
        request.push_str(&format!("Content-Type: {ct}\r\n"));
    }
    request.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    let mut raw = request.into_bytes();
    raw.extend_from_slice(body);
    exchange(addr, &raw)
}

/// Same as `send`, but without a Content-Length so the server only learns
/// the size while reading.
fn send_chunked(addr: SocketAddr, path: &str, content_type: &str, body: &[u8]) -> Reply {
    let mut raw = format!(
        "POST {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: {content_type}\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n",
        body.len()
    )
    .into_bytes();
    raw.extend_from_slice(body);
    raw.extend_from_slice(b"\r\n0\r\n\r\n");
    exchange(addr, &raw)
}

fn exchange(addr: SocketAddr, request: &[u8]) -> Reply {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(request).unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).unwrap();
    let split = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
    let head = String::from_utf8_lossy(&raw[..split]).into_owned();
    let status = head.split_whitespace().nth(1).unwrap().parse().unwrap();
    Reply {
        status,
        head,
        body: raw[split + 4..].to_vec(),
    }
}

fn multipart(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

fn red_png() -> Vec<u8> {
    encode_image(&RgbImage::from_pixel(4, 2, Rgb([255, 0, 0])), OutputFormat::Png, 95).unwrap()
}

#[test]
fn index_page_is_served() {
    let (addr, _dir) = start_server();
    let reply = send(addr, "GET", "/", None, b"");
    assert_eq!(reply.status, 200);
    assert!(String::from_utf8_lossy(&reply.body).contains("multipart/form-data"));
}

#[test]
fn api_edit_returns_png() {
    let (addr, _dir) = start_server();
    let png = red_png();
    let (ct, body) = multipart(
        &[("options", r#"{"brightness":"100","contrast":"100","grayscale":"100","rotate":450,"flip":false}"#)],
        Some(("red.png", png.as_slice())),
    );
    let reply = send(addr, "POST", "/api/edit", Some(&ct), &body);
    assert_eq!(reply.status, 200);
    assert!(reply.head.to_ascii_lowercase().contains("content-type: image/png"));

    let decoded = decode_bytes(&reply.body).unwrap();
    assert_eq!(decoded.image.dimensions(), (2, 4));
    assert!(decoded.image.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
}

#[test]
fn api_edit_rejects_invalid_rotation() {
    let (addr, _dir) = start_server();
    let png = red_png();
    let (ct, body) = multipart(&[("options", r#"{"rotate":45}"#)], Some(("red.png", png.as_slice())));
    let reply = send(addr, "POST", "/api/edit", Some(&ct), &body);
    assert_eq!(reply.status, 400);
    assert!(String::from_utf8_lossy(&reply.body).contains("rotate"));
}

#[test]
fn form_edit_stores_and_offers_download() {
    let (addr, dir) = start_server();
    let png = red_png();
    let (ct, body) = multipart(
        &[("brightness", "-10"), ("grayscale", "50"), ("rotate", "180"), ("edit", "")],
        Some(("my red.png", png.as_slice())),
    );
    let reply = send(addr, "POST", "/", Some(&ct), &body);
    assert_eq!(reply.status, 200);
    let html = String::from_utf8_lossy(&reply.body).into_owned();
    assert!(html.contains("/static/uploads/my_red.png"));
    assert!(html.contains("/download/edited_my_red.png"));
    assert!(dir.path().join("uploads/edited_my_red.png").is_file());

    let download = send(addr, "GET", "/download/edited_my_red.png", None, b"");
    assert_eq!(download.status, 200);
    assert!(download.head.contains("attachment; filename=\"edited_my_red.png\""));
    assert_eq!(decode_bytes(&download.body).unwrap().image.dimensions(), (4, 2));

    let inline = send(addr, "GET", "/static/uploads/my_red.png", None, b"");
    assert_eq!(inline.status, 200);
    assert_eq!(inline.body, png);
}

#[test]
fn form_reports_validation_errors_on_the_page() {
    let (addr, _dir) = start_server();
    let png = red_png();
    let (ct, body) = multipart(&[("rotate", "45"), ("edit", "")], Some(("x.png", png.as_slice())));
    let reply = send(addr, "POST", "/", Some(&ct), &body);
    assert_eq!(reply.status, 400);
    let html = String::from_utf8_lossy(&reply.body).into_owned();
    assert!(html.contains("class=\"notice\""));
    assert!(html.contains("/static/uploads/x.png"));
}

#[test]
fn unknown_and_traversal_paths_are_not_found() {
    let (addr, _dir) = start_server();
    assert_eq!(send(addr, "GET", "/nope", None, b"").status, 404);
    assert_eq!(send(addr, "GET", "/download/..%2Fsecret", None, b"").status, 404);
    assert_eq!(send(addr, "GET", "/download/missing.png", None, b"").status, 404);
    assert_eq!(send(addr, "DELETE", "/", None, b"").status, 405);
}

#[test]
fn browser_script_is_served() {
    let (addr, _dir) = start_server();
    let reply = send(addr, "GET", "/static/app.js", None, b"");
    assert_eq!(reply.status, 200);
    assert!(reply.head.to_ascii_lowercase().contains("content-type: text/javascript"));
    assert!(String::from_utf8_lossy(&reply.body).contains("/api/edit"));

    let page = send(addr, "GET", "/", None, b"");
    assert!(String::from_utf8_lossy(&page.body).contains("src=\"/static/app.js\""));
    assert_eq!(send(addr, "POST", "/static/app.js", None, b"").status, 405);
}

#[test]
fn oversized_bodies_are_rejected() {
    let (addr, dir) = start_server_with(|config| config.max_upload_bytes = 64);
    let png = red_png();
    let (ct, body) = multipart(&[("edit", "")], Some(("big.png", png.as_slice())));
    assert!(body.len() > 64);

    let declared = send(addr, "POST", "/", Some(&ct), &body);
    assert_eq!(declared.status, 413);
    assert!(String::from_utf8_lossy(&declared.body).contains("exceeds 64 bytes"));

    let streamed = send_chunked(addr, "/api/edit", &ct, &body);
    assert_eq!(streamed.status, 413);

    assert!(!dir.path().join("uploads/big.png").exists());
}

#[test]
fn head_requests_return_headers_only() {
    let (addr, _dir) = start_server();
    let index = send(addr, "HEAD", "/", None, b"");
    assert_eq!(index.status, 200);
    assert!(index.head.to_ascii_lowercase().contains("content-type: text/html"));
    assert!(index.body.is_empty());

    let png = red_png();
    let (ct, body) = multipart(&[("upload", "")], Some(("head.png", png.as_slice())));
    assert_eq!(send(addr, "POST", "/", Some(&ct), &body).status, 200);

    let download = send(addr, "HEAD", "/download/head.png", None, b"");
    assert_eq!(download.status, 200);
    assert!(download.head.to_ascii_lowercase().contains("content-type: image/png"));
    assert!(download.head.contains("attachment; filename=\"head.png\""));
    assert!(download.body.is_empty());
}
