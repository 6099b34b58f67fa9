//! medqa-common: Shared types, errors, and caller-facing DTOs used across all MedQA crates.

pub mod error;
pub mod entities;
pub mod response;

pub use entities::{Category, EntityMention, Match, PatternEntry, dominant_mention};
pub use error::{MedqaError, Result};
pub use response::{ApiResponse, QueryAnalysis, RecommendedQuestion, RelevantEntity};
