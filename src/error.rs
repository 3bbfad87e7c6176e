use thiserror::Error;

use crate::domain::utils::id::VertexId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse topology JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid link: {0}")]
    InvalidLink(String),

    #[error("The vertices {0} and {1} are already linked")]
    DuplicateLink(VertexId, VertexId),

    #[error("No route available from {from} to {to}")]
    RouteUnavailable { from: VertexId, to: VertexId },

    #[error("Unknown vertex: {0}")]
    UnknownVertex(VertexId),

    #[error("Link profile not recognized: {0}")]
    UnknownLinkProfile(String),
}

pub type Result<T> = std::result::Result<T, Error>;
