// Error types for quill.
// Covers transport, decoding, validation and configuration failures.

use reqwest::StatusCode;
use thiserror::Error;

use crate::state::NOT_FOUND_MESSAGE;

#[derive(Error, Debug)]
pub enum QuillError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A slug that is not among the loaded posts.
    #[error("{}", NOT_FOUND_MESSAGE)]
    PostNotFound(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid post data: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Other(String),
}

/// Reasons a post record is rejected at the ingestion boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("post title must be a non-empty string")]
    EmptyTitle,

    #[error("invalid date format: {0}")]
    InvalidDate(String),

    #[error("duplicate post id {0}")]
    DuplicateId(u64),

    #[error("duplicate post slug {0}")]
    DuplicateSlug(String),
}

pub type Result<T> = std::result::Result<T, QuillError>;
