//! Resource graph error types

use thiserror::Error;

/// Errors raised while building or synthesizing a resource graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    #[error("Unknown attribute '{attribute}' on {kind}")]
    UnknownAttribute { kind: String, attribute: String },

    #[error("Invalid logical name: {0}")]
    InvalidName(String),

    #[error("Reference to a declaration from another graph: {0}")]
    ForeignReference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
