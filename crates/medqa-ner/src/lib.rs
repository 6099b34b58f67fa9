//! Dictionary-based medical entity recognition.
//!
//! Builds an Aho-Corasick automaton once from a catalogue of graph entity
//! names, then resolves every raw hit into a left-to-right list of mentions
//! that prefers the longest, most specific name.

pub mod automaton;
pub mod embedded;
pub mod extractor;
pub mod loader;
pub mod resolver;

pub use automaton::{Automaton, AutomatonStats};
pub use extractor::EntityExtractor;
pub use loader::{load_patterns, parse_patterns};
pub use resolver::resolve;

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, NerError>;

#[derive(Debug, thiserror::Error)]
pub enum NerError {
    #[error("No patterns left after deduplication; refusing to build an empty automaton")]
    EmptyPatternSet,

    #[error("Malformed pattern record at line {line}: {reason}")]
    MalformedPatternRecord { line: usize, reason: String },

    #[error("Pattern source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Automaton build failed: {0}")]
    Build(#[from] aho_corasick::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
