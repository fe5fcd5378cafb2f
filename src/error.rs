use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [lopdf] failed to read or write the document
    Pdf(#[from] lopdf::Error),

    #[error(transparent)]
    /// [image] failed to decode the stamp image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// The definition file is not valid JSON for the expected shape
    Json(#[from] serde_json::Error),

    #[error("document could not be parsed: {0}")]
    /// The template bytes are not a usable PDF
    DocumentFormat(String),

    #[error("document is encrypted")]
    Encrypted,

    #[error("document has no pages")]
    NoPages,

    #[error("page index {0} is out of range")]
    PageMissing(usize),

    #[error("resource not found: {0}")]
    /// A stamp image locator did not point at a readable file
    ResourceNotFound(String),

    #[error("character {0:?} cannot be encoded by the overlay font")]
    GlyphEncoding(char),

    #[error("invalid geometry: {0}")]
    /// A paint command was given non-finite or non-positive dimensions
    InvalidGeometry(String),
}

pub type Result<T, E = OverlayError> = std::result::Result<T, E>;
