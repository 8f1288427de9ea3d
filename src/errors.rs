//! Error types for mcp-memory.

use thiserror::Error;

/// Main error type for memory store operations.
///
/// Caller-input variants are raised before any storage is touched.
/// Storage and embedding variants are faults propagated from the backend.
#[derive(Error, Debug)]
pub enum Error {
    /// Content or query is empty after trimming.
    #[error("Input cannot be empty")]
    EmptyInput,

    /// Importance outside the 1-5 range.
    #[error("Importance must be 1-5, got {0}")]
    InvalidImportance(i64),

    /// Result cap out of range.
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    /// Page or page size below 1.
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    /// `forget` called without ids, project or tags.
    #[error("Must specify at least one of: ids, project, tags")]
    MissingForgetCriteria,

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Namespace storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] crate::sqlite::Error),

    /// Stored metadata could not be decoded into a memory.
    #[error("Corrupt metadata for memory {id}: {reason}")]
    CorruptMetadata { id: String, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ONNX inference error.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Tokenization error.
    #[error("Tokenization error: {0}")]
    Tokenization(#[from] tokenizers::Error),

    /// ONNX session error.
    #[error("ONNX session error: {0}")]
    Onnx(#[from] ort::Error),

    /// HuggingFace Hub error.
    #[error("HuggingFace Hub error: {0}")]
    HfHub(#[from] hf_hub::api::sync::ApiError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors caused by caller input rather than a storage fault.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::InvalidImportance(_)
                | Error::InvalidLimit(_)
                | Error::InvalidPagination(_)
                | Error::MissingForgetCriteria
                | Error::InvalidInput(_)
        )
    }
}
