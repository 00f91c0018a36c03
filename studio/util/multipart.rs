/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut rest = haystack;
    while let Some(pos) = find_subsequence(rest, needle) {
        result.push(&rest[..pos]);
        rest = &rest[pos + needle.len()..];
    }
    result.push(rest);
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find_map(|s| s.strip_prefix("boundary="))
        .map(|b| b.trim_matches('"').to_owned())
}

/// Splits one part into its header block and its payload.
fn split_part(part: &[u8]) -> Option<(&[u8], &[u8])> {
    const SEP: &[u8] = b"\r\n\r\n";
    let sep_pos = find_subsequence(part, SEP)?;
    let payload = &part[sep_pos + SEP.len()..];
    Some((&part[..sep_pos], payload.strip_suffix(b"\r\n").unwrap_or(payload)))
}

/// Raw bytes of the first part that carries a `filename`, i.e. the first
/// uploaded file.
pub fn multipart_extract_file(body: &[u8], boundary: &str) -> Option<Vec<u8>> {
    let delimiter = format!("--{}", boundary);
    split_on(body, delimiter.as_bytes())
        .into_iter()
        .filter_map(split_part)
        .find(|(headers, _)| headers.windows(8).any(|w| w.eq_ignore_ascii_case(b"filename")))
        .map(|(_, payload)| payload.to_vec())
}
