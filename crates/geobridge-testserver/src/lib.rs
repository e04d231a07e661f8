//! Reference map server for integration testing.
//!
//! Implements enough of the admin REST API and the WMS/WFS/WMTS wire contract
//! for the client crates to run against: scope-unique names with 404/409
//! semantics, recursive deletes, capability rendering with title fallback,
//! an in-memory feature table behind WFS, and a tile cache that reports
//! MISS/HIT per tile key.
//!
//! The [`TestServer`] helper starts a server on a random port.

mod catalog;
mod ogc;
mod rest;
mod transaction;

pub use catalog::{Catalog, CatalogError, StoreKind};
pub use ogc::I18N_CONTENT_MISSING;

use serde_json::Value;
use std::sync::Arc;
use tiny_http::{Header, Response, Server, StatusCode};
use tracing::debug;

pub(crate) fn respond_err(req: tiny_http::Request, code: u16, msg: &str) {
    let _ = req.respond(Response::from_string(msg).with_status_code(StatusCode(code)));
}

pub(crate) fn respond_empty(req: tiny_http::Request, code: u16) {
    let _ = req.respond(Response::empty(StatusCode(code)));
}

pub(crate) fn respond_json(req: tiny_http::Request, json: Value) {
    let header = Header::from_bytes("Content-Type", "application/json").expect("valid header");
    let _ = req.respond(Response::from_data(json.to_string().into_bytes()).with_header(header));
}

pub(crate) fn respond_raw(req: tiny_http::Request, code: u16, content_type: &str, body: Vec<u8>) {
    let header = Header::from_bytes("Content-Type", content_type).expect("valid header");
    let _ = req.respond(
        Response::from_data(body)
            .with_header(header)
            .with_status_code(StatusCode(code)),
    );
}

pub(crate) fn read_body(req: &mut tiny_http::Request) -> Option<Vec<u8>> {
    let mut body = Vec::new();
    if req.as_reader().read_to_end(&mut body).is_ok() {
        Some(body)
    } else {
        None
    }
}

pub(crate) fn respond_catalog_err(req: tiny_http::Request, err: CatalogError) {
    match err {
        CatalogError::NotFound(msg) => respond_err(req, 404, &msg),
        CatalogError::Conflict(msg) => respond_err(req, 409, &msg),
        CatalogError::NotEmpty(msg) => respond_err(req, 403, &msg),
    }
}

/// Percent-decode a URL component; `+` decodes to a space.
pub(crate) fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 3 <= bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap_or("");
                match u8::from_str_radix(hex, 16) {
                    Ok(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    Err(_) => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Decoded key/value pairs of a query string.
pub(crate) fn query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (percent_decode(k), percent_decode(v)),
            None => (percent_decode(pair), String::new()),
        })
        .collect()
}

pub(crate) fn query_flag(query: &str, key: &str) -> bool {
    query_params(query)
        .iter()
        .any(|(k, v)| k == key && v == "true")
}

/// Handle a single HTTP request, dispatching on the path prefix.
pub fn handle_request(catalog: &Catalog, req: tiny_http::Request) {
    let method = req.method().clone();
    let url = req.url().to_owned();
    debug!("{method} {url}");

    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url.as_str(), ""),
    };

    if path.starts_with("/rest/") {
        rest::handle_rest(catalog, req, path, query);
    } else if path.starts_with("/gwc/rest/") {
        rest::handle_gwc_rest(catalog, req, path);
    } else if path == "/gwc/service/wmts" {
        ogc::handle_wmts(catalog, req, query);
    } else {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [workspace, "wms"] => {
                let workspace = percent_decode(workspace);
                ogc::handle_wms(catalog, req, &workspace, query);
            }
            [workspace, "ows"] => {
                let workspace = percent_decode(workspace);
                ogc::handle_wfs(catalog, req, &workspace, query);
            }
            _ => respond_err(req, 404, "not found"),
        }
    }
}

/// Start the server loop, blocking the current thread.
pub fn run_server(catalog: &Arc<Catalog>, addr: &str) {
    let server = Server::http(addr).expect("failed to bind HTTP server");
    for request in server.incoming_requests() {
        handle_request(catalog, request);
    }
}

/// Starts a server on a random port in a background thread.
///
/// The catalog is shared so tests can inspect or seed state directly.
pub struct TestServer {
    pub url: String,
    pub port: u16,
    pub catalog: Arc<Catalog>,
    _server: Arc<Server>,
    _handle: std::thread::JoinHandle<()>,
}

impl TestServer {
    /// Bind `127.0.0.1:0` and serve an empty catalog.
    pub fn start() -> Self {
        let server =
            Arc::new(Server::http("127.0.0.1:0").expect("failed to bind test HTTP server"));
        let port = server.server_addr().to_ip().expect("not an IP addr").port();
        let url = format!("http://127.0.0.1:{port}");

        let catalog = Arc::new(Catalog::new());
        let handler_catalog = Arc::clone(&catalog);
        let srv = Arc::clone(&server);
        let handle = std::thread::spawn(move || {
            for request in srv.incoming_requests() {
                handle_request(&handler_catalog, request);
            }
        });

        Self {
            url,
            port,
            catalog,
            _server: server,
            _handle: handle,
        }
    }
}
