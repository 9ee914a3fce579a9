//! Topology builder error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Unknown segment: {0}")]
    UnknownSegment(String),

    #[error("No image matches {0}")]
    NoImageMatch(String),

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Graph error: {0}")]
    Graph(#[from] terraloom_graph::GraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
