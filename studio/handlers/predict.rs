use std::io::{Cursor, Read};

use serde::Serialize;
use tiny_http::{Request, Response};
use tracing::{debug, warn};

use crate::routes::{json_error, json_response};
use crate::state::StudioState;
use crate::util::image::image_bytes_to_grayscale_input;
use crate::util::multipart::{extract_boundary, multipart_extract_file};

/// Body of a successful `/predict` response.
#[derive(Debug, Serialize)]
pub struct Prediction {
    pub label: usize,
    pub outputs: Vec<f32>,
}

pub fn handle_predict(request: &mut Request, state: &StudioState) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    if !content_type.starts_with("multipart/form-data") {
        return json_error(415, "expected a multipart/form-data image upload");
    }
    let boundary = match extract_boundary(&content_type) {
        Some(b) => b,
        None => return json_error(400, "multipart boundary missing"),
    };

    let mut body_bytes: Vec<u8> = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body_bytes) {
        warn!(error = %e, "could not read request body");
        return json_error(400, "could not read request body");
    }

    let image_bytes = match multipart_extract_file(&body_bytes, &boundary) {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return json_error(400, "no image file was uploaded"),
    };

    match predict_image(&image_bytes, state) {
        Ok(prediction) => match serde_json::to_string(&prediction) {
            Ok(body) => json_response(200, body),
            Err(e) => json_error(500, &e.to_string()),
        },
        Err(message) => json_error(400, &message),
    }
}

/// Decodes, resizes and classifies one image.
pub fn predict_image(bytes: &[u8], state: &StudioState) -> Result<Prediction, String> {
    let pixels = image_bytes_to_grayscale_input(bytes, state.side).map_err(|e| e.to_string())?;
    let activations = state.network.forward(&pixels).map_err(|e| e.to_string())?;
    let prediction = Prediction {
        label: activations.predicted_label(),
        outputs: activations.output().to_vec(),
    };
    debug!(label = prediction.label, "classified upload");
    Ok(prediction)
}
