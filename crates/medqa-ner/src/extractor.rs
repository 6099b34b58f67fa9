//! High-level entity extraction: scan, then resolve.

use std::path::Path;
use std::sync::Arc;

use medqa_common::EntityMention;
use tracing::info;

use crate::automaton::Automaton;
use crate::resolver::resolve;
use crate::{embedded, loader, Result};

/// Batches at or above this size are spread across the rayon pool.
const PARALLEL_BATCH_THRESHOLD: usize = 10;

/// Cheaply cloneable extractor over a shared, immutable automaton.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    automaton: Arc<Automaton>,
}

impl EntityExtractor {
    pub fn new(automaton: Automaton) -> Self {
        Self { automaton: Arc::new(automaton) }
    }

    /// Build from a JSONL entity export.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let patterns = loader::load_patterns(path)?;
        Ok(Self::new(Automaton::build(patterns)?))
    }

    /// Build from the built-in demo dictionary (no file I/O).
    pub fn with_embedded() -> Result<Self> {
        let automaton = Automaton::build(embedded::demo_patterns())?;
        info!("Using embedded demo dictionary ({} patterns)", automaton.len());
        Ok(Self::new(automaton))
    }

    /// Resolved mentions for one query, ordered by `start`.
    pub fn extract(&self, text: &str) -> Vec<EntityMention> {
        resolve(self.automaton.scan(text))
    }

    /// Extract from many texts. Output order follows input order.
    pub fn extract_batch(&self, texts: &[&str]) -> Vec<Vec<EntityMention>> {
        #[cfg(feature = "parallel")]
        {
            if texts.len() >= PARALLEL_BATCH_THRESHOLD {
                use rayon::prelude::*;
                return texts.par_iter().map(|text| self.extract(text)).collect();
            }
        }
        texts.iter().map(|text| self.extract(text)).collect()
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}
