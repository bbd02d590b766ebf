//! MIME type inference for downloads.

/// Infer the MIME type for a file name from its extension.
///
/// Unknown extensions fall back to `application/octet-stream`, which
/// triggers a plain save action in browsers.
pub fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}
