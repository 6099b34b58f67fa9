//! medqa-rag: Retrieval-augmented answer streaming.
//!
//! Pipeline: embed the question, fetch the nearest facts from the vector
//! index, wrap them in a grounded prompt and stream the model's answer back
//! as plain text deltas.

pub mod chat;
pub mod embedder;
pub mod index;
pub mod pipeline;
pub mod prompt;
pub mod sse;

pub use chat::{ChatBackend, ChatSettings, OpenAiCompatibleChat};
pub use embedder::{Embedder, HttpEmbedder};
pub use index::{FlatIndex, ScoredFact, VectorIndex};
pub use pipeline::RagPipeline;
pub use prompt::{build_prompt, NO_CONTEXT_APOLOGY};

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("Vector index not found: {0}")]
    IndexNotFound(PathBuf),

    #[error("Invalid vector index: {0}")]
    InvalidIndex(String),

    #[error("Embedding dimension mismatch: index has {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
