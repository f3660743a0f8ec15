use thiserror::Error;

/// Errors raised while validating user-supplied entity fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShelfError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Chapter number must be a positive integer")]
    InvalidChapterNumber,

    #[error("Unknown note author: {0}")]
    UnknownAuthor(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    #[error("Image is {size} bytes, the limit is {limit} bytes")]
    ImageTooLarge { size: u64, limit: u64 },

    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),
}

impl ShelfError {
    /// Stable machine-readable code for callers that render their own messages
    pub fn code(&self) -> &'static str {
        match self {
            ShelfError::EmptyField(_) => "EMPTY_FIELD",
            ShelfError::InvalidChapterNumber => "INVALID_CHAPTER_NUMBER",
            ShelfError::UnknownAuthor(_) => "UNKNOWN_AUTHOR",
            ShelfError::UnsupportedImageType(_) => "UNSUPPORTED_IMAGE_TYPE",
            ShelfError::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",
            ShelfError::InvalidImageUrl(_) => "INVALID_IMAGE_URL",
        }
    }

    /// Whether this error concerns a cover image rather than a text field
    pub fn is_image_error(&self) -> bool {
        matches!(
            self,
            ShelfError::UnsupportedImageType(_)
                | ShelfError::ImageTooLarge { .. }
                | ShelfError::InvalidImageUrl(_)
        )
    }
}
