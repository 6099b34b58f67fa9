//! medqa-kg: Knowledge graph lookups, direct answers and follow-up questions.
//!
//! The graph is only ever asked single-hop questions ("does disease N have
//! any symptom?", "which symptoms?") and free-text node properties.
//! Backends implement [`GraphOracle`]. [`GraphAnswerer`] turns an intent and
//! its main entity into an answer line; [`Recommender`] turns probe hits
//! into a ranked shortlist of follow-up questions.

pub mod answer;
pub mod facets;
pub mod memory;
pub mod neo4j;
pub mod oracle;
pub mod recommender;
pub mod relation;

pub use answer::{AnswerOutcome, GraphAnswer, GraphAnswerer};
pub use memory::{GraphNode, InMemoryGraph};
pub use neo4j::Neo4jClient;
pub use oracle::GraphOracle;
pub use recommender::{Recommender, MAX_RECOMMENDATIONS};
pub use relation::{Direction, HopProbe, NodeProperty, Relation};

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, KgError>;

#[derive(Debug, thiserror::Error)]
pub enum KgError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Graph query failed [{code}]: {message}")]
    Query { code: String, message: String },

    #[error("Unexpected graph response: {0}")]
    UnexpectedResponse(String),

    #[error("Graph lookup timed out after {0} ms")]
    Timeout(u64),

    #[error("Graph fixture not found: {0}")]
    FixtureNotFound(PathBuf),

    #[error("Invalid graph fixture: {0}")]
    InvalidFixture(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
