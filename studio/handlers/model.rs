use std::io::Cursor;
use tiny_http::Response;

use crate::routes::{json_error, json_response};
use crate::state::StudioState;

/// Returns the loaded parameters in the same JSON layout `train` writes.
pub fn handle_get(state: &StudioState) -> Response<Cursor<Vec<u8>>> {
    match serde_json::to_string(&state.export) {
        Ok(body) => json_response(200, body),
        Err(e) => json_error(500, &e.to_string()),
    }
}
