//! Embedded web server for the cook book.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - `GET /`: the landing page with every operation form
//! - `POST /url/api`, `POST /url/sdk`: change a node URL
//! - `POST /<route>` and `POST /<route>/<sid>`: run one operation
//!
//! Every known route answers 200 with an HTML page, including when the
//! operation failed. Anything else is a 404 page.

use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::config::schema::ServerConfig;
use crate::dispatch::Cookbook;
use crate::form::FormData;

/// A rendered response before it is handed to `tiny_http`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub html: String,
}

impl Page {
    fn ok(html: String) -> Self {
        Self { status: 200, html }
    }

    fn not_found(path: &str) -> Self {
        Self {
            status: 404,
            html: crate::render::not_found(path),
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the server on `server.bind:server.port`.
///
/// Blocks the current thread. Requests are handled by a fixed pool of
/// [`ServerConfig::worker_count`] threads pulling from the shared listener; a failing
/// request never takes the server down.
pub fn serve(cookbook: Arc<Cookbook>, server: &ServerConfig) -> Result<()> {
    let addr = server.addr();
    let listener = Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;
    let listener = Arc::new(listener);

    let count = server.worker_count();
    log::info!("cook book listening on http://{addr} with {count} workers");

    let mut workers = Vec::with_capacity(count);
    for n in 0..count {
        let listener = Arc::clone(&listener);
        let cookbook = Arc::clone(&cookbook);
        let worker = thread::Builder::new()
            .name(format!("cookbook-worker-{n}"))
            .spawn(move || worker_loop(&listener, &cookbook))
            .context("failed to spawn worker thread")?;
        workers.push(worker);
    }

    for worker in workers {
        if worker.join().is_err() {
            log::error!("worker thread panicked");
        }
    }
    Ok(())
}

fn worker_loop(listener: &Server, cookbook: &Cookbook) {
    loop {
        match listener.recv() {
            Ok(request) => handle_request(request, cookbook),
            Err(e) => {
                log::error!("failed to receive request: {e}");
                break;
            }
        }
    }
}

fn handle_request(mut request: Request, cookbook: &Cookbook) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();

    // Read body up-front for methods that carry one
    let body = if method == Method::Post {
        let mut buf = String::new();
        if let Err(e) = request.as_reader().read_to_string(&mut buf) {
            log::warn!("failed to read body of {method} {url}: {e}");
        }
        buf
    } else {
        String::new()
    };

    let page = route(cookbook, &method, &url, &body);
    let status = page.status;

    let mut response = Response::from_string(page.html).with_status_code(StatusCode(status));
    if let Ok(header) = Header::from_bytes("Content-Type", "text/html; charset=utf-8") {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        log::warn!("failed to send response for {method} {url}: {e}");
    }

    log::info!(
        "{method} {url} {status} {}ms",
        started.elapsed().as_millis()
    );
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Map a request to a page.
pub fn route(cookbook: &Cookbook, method: &Method, url: &str, body: &str) -> Page {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Page::ok(cookbook.landing()),
        (&Method::Post, _) => {
            let form = FormData::parse(body);
            let Some(rest) = path.strip_prefix('/') else {
                return Page::not_found(path);
            };
            let (stem, suffix) = match rest.split_once('/') {
                Some((stem, suffix)) => (stem, Some(suffix)),
                None => (rest, None),
            };
            if stem == "url" {
                return match suffix {
                    Some(target) if !target.contains('/') => {
                        Page::ok(cookbook.change_url(target, &form))
                    }
                    _ => Page::not_found(path),
                };
            }
            match suffix {
                Some(sid) if sid.is_empty() || sid.contains('/') => Page::not_found(path),
                _ => cookbook
                    .handle(stem, suffix, &form)
                    .map(Page::ok)
                    .unwrap_or_else(|| Page::not_found(path)),
            }
        }
        _ => Page::not_found(path),
    }
}
