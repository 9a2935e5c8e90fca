//! API request handlers

use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::{Response, StatusCode};
use http_body_util::Full;
use notas_static::{FileServer, Lister, Lookup};
use serde::Serialize;

/// Response body type used by every handler
pub type Body = Full<Bytes>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Handle GET on the listing route
pub async fn list_files(lister: &Lister) -> Response<Body> {
    match lister.list().await {
        Ok(files) => match serde_json::to_vec(&files) {
            Ok(json) => json_response(StatusCode::OK, json),
            Err(e) => list_error(e.to_string()),
        },
        Err(e) => list_error(e.to_string()),
    }
}

fn list_error(message: String) -> Response<Body> {
    tracing::error!("❌ Listing failed: {}", message);
    let body = serde_json::to_vec(&ErrorBody { error: message }).unwrap_or_default();
    json_response(StatusCode::INTERNAL_SERVER_ERROR, body)
}

/// Handle a request for one file.
///
/// Returns `None` when the request carries no usable name, leaving the
/// response to the router's fallback.
pub async fn serve_file(file_server: &FileServer, name: &str, head: bool) -> Option<Response<Body>> {
    match file_server.serve(name).await {
        Ok(Lookup::Found(file)) => {
            let body = if head { Bytes::new() } else { file.content };
            let mut resp = Response::new(Full::new(body));
            let headers = resp.headers_mut();
            if let Ok(ct) = HeaderValue::from_str(&file.content_type) {
                headers.insert(header::CONTENT_TYPE, ct);
            }
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(file.content_length));
            if let Some(lm) = file.last_modified.and_then(|lm| HeaderValue::from_str(&lm).ok()) {
                headers.insert(header::LAST_MODIFIED, lm);
            }
            Some(resp)
        }
        Ok(Lookup::NotFound) => Some(text_response(StatusCode::NOT_FOUND, "Not found")),
        Ok(Lookup::Declined) => None,
        Err(e) => {
            tracing::error!("❌ Failed to read {:?}: {}", name, e);
            Some(text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
        }
    }
}

/// Handle GET /health
pub fn health_check() -> Response<Body> {
    json_response(StatusCode::OK, r#"{"status":"healthy"}"#)
}

/// Plain text response
pub fn text_response(status: StatusCode, body: &'static str) -> Response<Body> {
    let mut resp = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    resp
}

fn json_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Body> {
    let mut resp = Response::new(Full::new(body.into()));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}
