//! HTTP front end: upload form, JSON-options edit endpoint, and serving of
//! stored originals and edited images.

pub mod multipart;
pub mod page;
pub mod response;

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use tiny_http::{Method, Request, Server};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::core::params::{ClientOptions, FilterParams};
use crate::core::processing::pipeline;
use crate::error::{Error, Result};
use crate::io::decode::decode_bytes;
use crate::io::storage::UploadStore;
use crate::io::writers::encode_image;
use crate::types::OutputFormat;

use multipart::FormData;
use page::PageView;
use response::{Reply, mime};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

const UPLOADS_PREFIX: &str = "/static/uploads/";
const DOWNLOAD_PREFIX: &str = "/download/";
const APP_JS_PATH: &str = "/static/app.js";

/// Shared, read-only state handed to every request.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: UploadStore,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let store = UploadStore::from_config(&config)?;
        Ok(Self { config, store })
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Server,
    addr: SocketAddr,
    state: Arc<AppState>,
}

/// Bind the HTTP server without starting the request loop.
pub fn bind(config: ServerConfig) -> Result<BoundServer> {
    let state = Arc::new(AppState::new(config)?);
    let (server, addr) = bind_with_retry(&state.config)?;
    info!("Serving on http://{}", addr);
    info!("Uploads stored in {:?}", state.store.root());
    Ok(BoundServer {
        server,
        addr,
        state,
    })
}

/// Bind to the configured interface and port, trying the next ports when taken.
/// Port 0 binds once to an ephemeral port.
fn bind_with_retry(config: &ServerConfig) -> Result<(Server, SocketAddr)> {
    let attempts = if config.port == 0 { 1 } else { MAX_PORT_RETRIES };
    let mut last_error = String::new();
    for offset in 0..attempts {
        let port = config.port.saturating_add(offset);
        let requested = SocketAddr::new(config.host, port);
        match Server::http(requested) {
            Ok(server) => {
                if offset > 0 {
                    warn!("Port {} in use, using {} instead", config.port, port);
                }
                let addr = server.server_addr().to_ip().unwrap_or(requested);
                return Ok((server, addr));
            }
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(Error::Io(std::io::Error::new(
        std::io::ErrorKind::AddrInUse,
        format!(
            "Failed to bind after {} attempts starting at {}: {}",
            attempts,
            config.socket_addr(),
            last_error
        ),
    )))
}

impl BoundServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.state.config.workers)
            .thread_name(|i| format!("pixtweak-http-{i}"))
            .build()
            .map_err(|e| Error::Config(format!("failed to create request pool: {e}")))?;

        for request in self.server.incoming_requests() {
            let state = Arc::clone(&self.state);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &state) {
                    warn!("Request error: {}", e);
                }
            });
        }
        Ok(())
    }
}

/// Route a single request and send the reply.
pub fn handle_request(mut request: Request, state: &AppState) -> Result<()> {
    let method = request.method().clone();
    let path = request.url().split('?').next().unwrap_or("/").to_string();
    let head_only = method == Method::Head;

    let reply = match route(&mut request, &method, &path, state) {
        Ok(reply) => reply,
        Err(e) => {
            warn!("{} {} failed: {}", method, path, e);
            Reply::from_error(&e)
        }
    };
    info!("{} {} -> {}", method, path, reply.status);
    response::send(request, reply, head_only)
}

fn route(request: &mut Request, method: &Method, path: &str, state: &AppState) -> Result<Reply> {
    let readable = matches!(method, Method::Get | Method::Head);
    match path {
        "/" => match method {
            Method::Get | Method::Head => Ok(Reply::html(200, PageView::default().render())),
            Method::Post => handle_form(request, state),
            _ => Ok(Reply::method_not_allowed("GET, HEAD, POST")),
        },
        "/api/edit" => match method {
            Method::Post => handle_api_edit(request, state),
            _ => Ok(Reply::method_not_allowed("POST")),
        },
        APP_JS_PATH => match method {
            Method::Get | Method::Head => Ok(Reply::new(200, mime::JAVASCRIPT, page::APP_JS.into())),
            _ => Ok(Reply::method_not_allowed("GET, HEAD")),
        },
        p if p.starts_with(UPLOADS_PREFIX) => {
            if !readable {
                return Ok(Reply::method_not_allowed("GET, HEAD"));
            }
            let file = state.store.resolve(&p[UPLOADS_PREFIX.len()..])?;
            Reply::file(&file, false)
        }
        p if p.starts_with(DOWNLOAD_PREFIX) => {
            if !readable {
                return Ok(Reply::method_not_allowed("GET, HEAD"));
            }
            let file = state.store.resolve(&p[DOWNLOAD_PREFIX.len()..])?;
            Reply::file(&file, true)
        }
        _ => Ok(Reply::not_found()),
    }
}

/// The upload form: store the original and, when the edit button was
/// pressed, the edited version too.
fn handle_form(request: &mut Request, state: &AppState) -> Result<Reply> {
    let form = read_form(request, state.config.max_upload_bytes)?;
    let mut view = PageView::default();

    let Some(file) = form.file("image") else {
        view.notice = Some("Please choose an image to upload.".into());
        return Ok(Reply::html(400, view.render()));
    };

    debug!(
        "Upload {:?} ({}, {} bytes)",
        file.filename,
        file.content_type.as_deref().unwrap_or("no content type"),
        file.data.len()
    );
    let stored = state.store.save_upload(&file.filename, &file.data)?;
    view.original = Some(format!("{UPLOADS_PREFIX}{stored}"));

    if !form.has_field("edit") {
        return Ok(Reply::html(200, view.render()));
    }

    let outcome = FilterParams::from_form(form.fields())
        .map_err(Error::from)
        .and_then(|params| {
            view.params = params;
            edit_upload(&file.data, &params, state)
        });

    match outcome {
        Ok((edited_bytes, format)) => {
            let edited = state.store.save_edited(&stored, format, &edited_bytes)?;
            view.edited = Some(format!("{UPLOADS_PREFIX}{edited}"));
            view.download = Some(format!("{DOWNLOAD_PREFIX}{edited}"));
            Ok(Reply::html(200, view.render()))
        }
        Err(e) => {
            warn!("Edit of {} rejected: {}", stored, e);
            let status = e.status_code();
            view.notice = Some(e.to_string());
            Ok(Reply::html(status, view.render()))
        }
    }
}

fn edit_upload(
    data: &[u8],
    params: &FilterParams,
    state: &AppState,
) -> Result<(Vec<u8>, OutputFormat)> {
    let decoded = decode_bytes(data)?;
    let format = decoded
        .format
        .map(OutputFormat::from_image_format)
        .unwrap_or(OutputFormat::Png);
    let edited = pipeline::apply(&decoded.image, params)?;
    let bytes = encode_image(&edited, format, state.config.jpeg_quality)?;
    Ok((bytes, format))
}

/// Browser-script endpoint: `image` file plus an `options` JSON blob in, PNG out.
fn handle_api_edit(request: &mut Request, state: &AppState) -> Result<Reply> {
    let form = read_form(request, state.config.max_upload_bytes)?;
    let file = form
        .file("image")
        .ok_or_else(|| Error::Request("missing image file".into()))?;

    let params = match form.field("options") {
        Some(json) if !json.trim().is_empty() => ClientOptions::from_json(json)?.into_params()?,
        _ => FilterParams::default(),
    };
    debug!("API edit with {:?}", params);

    let decoded = decode_bytes(&file.data)?;
    let edited = pipeline::apply(&decoded.image, &params)?;
    let bytes = encode_image(&edited, OutputFormat::Png, state.config.jpeg_quality)?;
    Ok(Reply::new(200, mime::PNG, bytes))
}

fn read_form(request: &mut Request, limit: usize) -> Result<FormData> {
    let content_type = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_string())
        .ok_or_else(|| Error::Request("missing Content-Type".into()))?;
    let boundary = multipart::boundary_from_content_type(&content_type)
        .ok_or_else(|| Error::Request(format!("expected multipart/form-data, got {content_type}")))?;

    if request.body_length().is_some_and(|len| len > limit) {
        return Err(Error::PayloadTooLarge { limit });
    }
    let mut body = Vec::new();
    request
        .as_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut body)?;
    if body.len() > limit {
        return Err(Error::PayloadTooLarge { limit });
    }

    multipart::parse(&body, &boundary)
}
