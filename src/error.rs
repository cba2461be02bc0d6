//! Error types for reading describe documents
//!
//! The transformation pipeline itself never fails; these errors only come
//! from turning external documents into the typed model.

use thiserror::Error;

/// Errors that can occur while loading a describe document
#[derive(Error, Debug)]
pub enum DescribeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid describe document: {0}")]
    InvalidDocument(String),
}

/// Result type for describe loading
pub type DescribeResult<T> = Result<T, DescribeError>;
