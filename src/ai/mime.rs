//! Image MIME detection for data URLs.

use std::path::Path;

/// Guess an image MIME type from magic bytes, then from the file extension.
pub fn detect_image_mime(bytes: &[u8], path: &Path) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        _ => mime_from_extension(path),
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => {
            tracing::warn!(
                "Unrecognized image format for {}, falling back to image/jpeg",
                path.display()
            );
            "image/jpeg"
        }
    }
}
