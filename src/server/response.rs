//! HTTP replies: built by the route handlers, sent in one place.

use std::path::Path;

use tiny_http::{Header, Request, Response, StatusCode};

use crate::error::{Error, Result};

pub mod mime {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const BMP: &str = "image/bmp";

    /// Guess the Content-Type of a stored file from its extension.
    pub fn from_path(path: &std::path::Path) -> &'static str {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => PNG,
            Some("jpg" | "jpeg") => JPEG,
            Some("gif") => GIF,
            Some("webp") => WEBP,
            Some("bmp") => BMP,
            _ => OCTET_STREAM,
        }
    }
}

/// A response waiting to be sent.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub headers: Vec<(&'static str, String)>,
}

impl Reply {
    pub fn new(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            headers: Vec::new(),
        }
    }

    pub fn html(status: u16, body: String) -> Self {
        Self::new(status, mime::HTML, body.into_bytes())
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, mime::PLAIN, body.into().into_bytes())
    }

    pub fn not_found() -> Self {
        Self::text(404, "404 Not Found")
    }

    pub fn method_not_allowed(allow: &'static str) -> Self {
        Self::text(405, "405 Method Not Allowed").with_header("Allow", allow)
    }

    /// Plain-text body carrying the error message, with the matching status.
    pub fn from_error(error: &Error) -> Self {
        Self::text(error.status_code(), error.to_string())
    }

    /// Serve a stored file, inline or as a download.
    pub fn file(path: &Path, as_attachment: bool) -> Result<Self> {
        let body = std::fs::read(path)?;
        let mut reply = Self::new(200, mime::from_path(path), body);
        if as_attachment {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("download");
            reply = reply.with_header(
                "Content-Disposition",
                format!("attachment; filename=\"{name}\""),
            );
        }
        Ok(reply)
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

fn make_header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| Error::Request(format!("invalid header value for {name}")))
}

/// Send `reply`; for HEAD requests only the status and headers go out.
pub fn send(request: Request, reply: Reply, head_only: bool) -> Result<()> {
    let mut headers = vec![make_header("Content-Type", reply.content_type)?];
    for (name, value) in &reply.headers {
        headers.push(make_header(name, value)?);
    }

    if head_only {
        let mut response = Response::empty(StatusCode(reply.status));
        for header in headers {
            response = response.with_header(header);
        }
        request.respond(response)?;
        return Ok(());
    }

    let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
    for header in headers {
        response = response.with_header(header);
    }
    request.respond(response)?;
    Ok(())
}
