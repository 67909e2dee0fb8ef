use image::ImageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] ImageError),

    #[error("failed to encode preview: {0}")]
    Encode(#[source] ImageError),

    #[error("invalid palette code: {0} (expected 0..=6)")]
    InvalidPaletteCode(u8),

    #[error("expected {expected} palette codes, got {actual}")]
    Dimensions { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
