//! Cover image helpers.
//!
//! A book cover is stored as a single string: either a remote http(s) URL or an
//! inline `data:` URL holding the base64-encoded file. These helpers check an
//! upload or link before it is attached to a book.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

use crate::error::ShelfError;

/// Largest accepted upload (5 MiB)
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted for uploaded covers
pub const SUPPORTED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// How a stored cover string is represented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverKind {
    Url,
    DataBlob,
}

impl CoverKind {
    pub fn classify(cover: &str) -> Option<Self> {
        let cover = cover.trim();
        if cover.is_empty() {
            None
        } else if cover.starts_with("data:") {
            Some(CoverKind::DataBlob)
        } else {
            Some(CoverKind::Url)
        }
    }
}

/// Accept only absolute http(s) links
pub fn validate_image_url(raw: &str) -> Result<Url, ShelfError> {
    let url = Url::parse(raw.trim()).map_err(|e| ShelfError::InvalidImageUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ShelfError::InvalidImageUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Check an uploaded file's declared MIME type and size
pub fn validate_image_file(mime: &str, size: u64) -> Result<(), ShelfError> {
    if !SUPPORTED_IMAGE_TYPES.contains(&mime) {
        return Err(ShelfError::UnsupportedImageType(mime.to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ShelfError::ImageTooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Validate an in-memory upload and encode it as a `data:` URL
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> Result<String, ShelfError> {
    validate_image_file(mime, bytes.len() as u64)?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image_url() {
        assert!(validate_image_url("https://covers.example.com/dune.jpg").is_ok());
        assert!(validate_image_url("http://example.com/a.png").is_ok());
        assert!(validate_image_url("ftp://example.com/a.png").is_err());
        assert!(validate_image_url("not a url").is_err());
        assert!(validate_image_url("").is_err());
    }

    #[test]
    fn test_validate_image_file() {
        assert!(validate_image_file("image/png", 1024).is_ok());
        assert!(validate_image_file("image/gif", MAX_IMAGE_BYTES).is_ok());
        assert_eq!(
            validate_image_file("image/bmp", 10),
            Err(ShelfError::UnsupportedImageType("image/bmp".to_string()))
        );
        assert_eq!(
            validate_image_file("image/jpeg", MAX_IMAGE_BYTES + 1),
            Err(ShelfError::ImageTooLarge {
                size: MAX_IMAGE_BYTES + 1,
                limit: MAX_IMAGE_BYTES
            })
        );
    }

    #[test]
    fn test_encode_data_url() {
        let url = encode_data_url("image/png", b"abc").unwrap();
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert_eq!(CoverKind::classify(&url), Some(CoverKind::DataBlob));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            CoverKind::classify("https://example.com/x.png"),
            Some(CoverKind::Url)
        );
        assert_eq!(CoverKind::classify("  "), None);
    }
}
