//! MIME type handling

/// Content type for documents carrying `extension`
pub fn content_type_for_extension(extension: &str) -> &'static str {
    mime_guess::from_ext(extension)
        .first_raw()
        .unwrap_or("application/octet-stream")
}
