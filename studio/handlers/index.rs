use std::io::Cursor;
use tiny_http::Response;

use crate::routes::html_response;
use crate::state::StudioState;

pub fn handle_get(state: &StudioState) -> Response<Cursor<Vec<u8>>> {
    html_response(index_page(state))
}

fn index_page(state: &StudioState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>ferrite-digits Studio</title></head>
<body>
  <h1>ferrite-digits Studio</h1>
  <p>Network <code>{shape}</code>. Uploaded images are converted to grayscale
  and resized to {side}&times;{side} pixels.</p>
  <form method="POST" action="/predict" enctype="multipart/form-data">
    <input type="file" name="image" accept="image/*">
    <button type="submit">Classify</button>
  </form>
  <p><a href="/model">Download parameters</a></p>
</body>
</html>"#,
        shape = state.network.shape(),
        side = state.side,
    )
}
