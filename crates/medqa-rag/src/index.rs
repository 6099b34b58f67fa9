//! Vector index over medical fact sentences.
//!
//! [`FlatIndex`] is an exact, brute-force cosine index. Vectors are
//! normalized once at load time so a search is a dot product per fact.
//!
//! File format:
//! ```json
//! {"dimension": 3, "facts": [{"text": "感冒通常由病毒引起。", "embedding": [0.1, 0.2, 0.3]}]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{RagError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFact {
    pub text: String,
    pub score: f32,
}

pub trait VectorIndex: Send + Sync {
    /// Up to `k` facts, most similar first.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredFact>>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    dimension: usize,
    facts: Vec<FactRecord>,
}

#[derive(Debug, Deserialize)]
struct FactRecord {
    text: String,
    embedding: Vec<f32>,
}

#[derive(Debug, Default)]
pub struct FlatIndex {
    dimension: usize,
    texts: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self { dimension, ..Default::default() }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RagError::IndexNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let index = Self::from_json_str(&raw)?;
        info!(facts = index.len(), dimension = index.dimension, "Loaded vector index from {:?}", path);
        Ok(index)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: IndexFile =
            serde_json::from_str(raw).map_err(|e| RagError::InvalidIndex(e.to_string()))?;
        let mut index = Self::new(file.dimension);
        for fact in file.facts {
            index.insert(fact.text, fact.embedding)?;
        }
        Ok(index)
    }

    pub fn insert(&mut self, text: impl Into<String>, embedding: Vec<f32>) -> Result<()> {
        if embedding.len() != self.dimension {
            return Err(RagError::DimensionMismatch { expected: self.dimension, actual: embedding.len() });
        }
        self.texts.push(text.into());
        self.vectors.push(normalize(embedding));
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredFact>> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch { expected: self.dimension, actual: query.len() });
        }
        if k == 0 || self.texts.is_empty() {
            return Ok(Vec::new());
        }

        let query = normalize(query.to_vec());
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(&query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| ScoredFact { text: self.texts[i].clone(), score })
            .collect())
    }

    fn len(&self) -> usize {
        self.texts.len()
    }
}
