use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::handlers;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn with_content_type(body: Vec<u8>, status: u16, content_type: &str) -> Response<Cursor<Vec<u8>>> {
    let response = Response::from_data(body).with_status_code(StatusCode(status));
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    with_content_type(body.into_bytes(), 200, "text/html; charset=utf-8")
}

pub fn json_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    with_content_type(body.into_bytes(), status, "application/json")
}

/// `{"error": "<message>"}` with the given status.
pub fn json_error(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    json_response(status, body)
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    with_content_type(b"404 Not Found".to_vec(), 404, "text/plain")
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Query strings are ignored; routing is on method and path alone.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();
    let path = url.split('?').next().unwrap_or("");

    let response = match (method, path) {
        (Method::Get, "/") => handlers::index::handle_get(&state),
        (Method::Post, "/predict") => handlers::predict::handle_predict(&mut request, &state),
        (Method::Get, "/model") => handlers::model::handle_get(&state),
        _ => not_found(),
    };

    tracing::debug!(method = %request.method(), url = %url, status = response.status_code().0, "request");
    let _ = request.respond(response);
}
