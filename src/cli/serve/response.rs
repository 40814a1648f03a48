//! HTTP response handlers.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::core::UrlPath;
use crate::embed::serve::{NOT_FOUND_HTML, NotFoundVars};
use crate::utils::mime::types::{HTML, PLAIN};

/// Permanent redirect that keeps the request method.
const REDIRECT_STATUS: u16 = 308;

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    respond_file_with_status(request, path, 200)
}

fn respond_file_with_status(request: Request, path: &Path, status: u16) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, status, content_type);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, status, content_type, body)
}

/// Respond with a redirect to `location`.
pub fn respond_redirect(request: Request, location: &str) -> Result<()> {
    let location = Header::from_bytes("Location", location.as_bytes())
        .map_err(|()| anyhow!("invalid redirect location `{location}`"))?;
    let response = Response::empty(StatusCode(REDIRECT_STATUS))
        .with_header(location)
        .with_header(make_header("Content-Type", PLAIN)?);
    request.respond(response)?;
    Ok(())
}

/// Respond with 404 page: the output's own `404.html`, else the embedded one.
pub fn respond_not_found(
    request: Request,
    serve_root: &Path,
    path: &UrlPath,
    home: &str,
) -> Result<()> {
    let custom_404 = serve_root.join("404.html");
    if custom_404.is_file() {
        return respond_file_with_status(request, &custom_404, 404);
    }

    if is_head_request(&request) {
        return send_head(request, 404, HTML);
    }

    let body = NOT_FOUND_HTML.render(&NotFoundVars {
        path: path.as_str(),
        home,
    });
    send_body(request, 404, HTML, body.into_bytes())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}
