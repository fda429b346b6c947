use thiserror::Error;

/// Errors surfaced by the search engine. None of them are fatal: every
/// failure leaves the corpus and index exactly as they were.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Uploaded bytes could not be decoded as UTF-8 text.
    #[error("document text is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// A document with this identity is already stored.
    #[error("document already exists: {0}")]
    DuplicateId(String),

    /// No document with this identity is stored.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The index does not reflect the current corpus yet.
    #[error("index is stale; a rebuild is pending")]
    NotReady,
}

pub type Result<T> = std::result::Result<T, EngineError>;
