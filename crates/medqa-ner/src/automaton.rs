//! Multi-pattern matcher over the entity dictionary.
//!
//! Wraps an `aho-corasick` automaton (trie + failure links) in standard match
//! semantics so that a single pass over the query reports every occurrence of
//! every pattern, overlapping ones included. Disambiguation is left entirely
//! to [`crate::resolver`].
//!
//! # Performance
//! - Scan is O(n + matches), independent of dictionary size
//! - The handle is immutable after [`Automaton::build`] and is shared across
//!   request handlers behind an `Arc` without locking

use ahash::AHashMap;
use aho_corasick::{AhoCorasick, MatchKind};
use medqa_common::{Category, Match, PatternEntry};
use tracing::{debug, info, warn};

use crate::{NerError, Result};

/// Immutable Aho-Corasick handle plus the payload for each pattern id.
#[derive(Debug)]
pub struct Automaton {
    matcher: AhoCorasick,
    /// Pattern id -> payload. Index matches the automaton's pattern id.
    entries: Vec<PatternEntry>,
    /// Pattern id -> length in characters, cached for span computation.
    char_lens: Vec<usize>,
    index: AHashMap<String, usize>,
    stats: AutomatonStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomatonStats {
    pub total_patterns: usize,
    /// Inserts that replaced an earlier payload for the same text.
    pub replaced: usize,
    /// Entries rejected because their text was empty.
    pub skipped_empty: usize,
    counts: [usize; 7],
}

impl AutomatonStats {
    pub fn count(&self, category: Category) -> usize {
        self.counts[category_slot(category)]
    }
}

fn category_slot(category: Category) -> usize {
    match category {
        Category::Disease    => 0,
        Category::Symptom    => 1,
        Category::Drug       => 2,
        Category::Check      => 3,
        Category::Department => 4,
        Category::Food       => 5,
        Category::Producer   => 6,
    }
}

impl Automaton {
    /// Build the automaton from dictionary entries.
    ///
    /// Duplicate texts collapse to the last-seen payload while keeping the
    /// position of their first insertion. Fails with
    /// [`NerError::EmptyPatternSet`] when nothing usable remains.
    pub fn build<I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = PatternEntry>,
    {
        let mut entries: Vec<PatternEntry> = Vec::new();
        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut stats = AutomatonStats::default();

        for entry in patterns {
            if entry.text.is_empty() {
                stats.skipped_empty += 1;
                continue;
            }
            match index.get(&entry.text) {
                Some(&id) => {
                    if entries[id].category != entry.category {
                        debug!(
                            text = %entry.text,
                            old = %entries[id].category,
                            new = %entry.category,
                            "Pattern payload replaced"
                        );
                    }
                    entries[id] = entry;
                    stats.replaced += 1;
                }
                None => {
                    index.insert(entry.text.clone(), entries.len());
                    entries.push(entry);
                }
            }
        }

        if stats.skipped_empty > 0 {
            warn!("Skipped {} empty pattern(s)", stats.skipped_empty);
        }
        if entries.is_empty() {
            return Err(NerError::EmptyPatternSet);
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(entries.iter().map(|e| e.text.as_str()))?;

        let char_lens = entries.iter().map(PatternEntry::char_len).collect();
        stats.total_patterns = entries.len();
        for e in &entries {
            stats.counts[category_slot(e.category)] += 1;
        }

        info!(
            total = stats.total_patterns,
            diseases = stats.count(Category::Disease),
            symptoms = stats.count(Category::Symptom),
            drugs = stats.count(Category::Drug),
            checks = stats.count(Category::Check),
            departments = stats.count(Category::Department),
            foods = stats.count(Category::Food),
            producers = stats.count(Category::Producer),
            replaced = stats.replaced,
            "Entity automaton built"
        );

        Ok(Self { matcher, entries, char_lens, index, stats })
    }

    /// Report every occurrence of every pattern in `text`.
    ///
    /// Matches come out in the automaton's discovery order (ascending end
    /// position). Spans are character offsets with an inclusive end.
    pub fn scan(&self, text: &str) -> Vec<Match> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of each char; matches always start on a char boundary.
        let char_starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        let to_char = |byte: usize| char_starts.binary_search(&byte).unwrap_or_else(|i| i);

        self.matcher
            .find_overlapping_iter(text)
            .map(|m| {
                let id = m.pattern().as_usize();
                let entry = &self.entries[id];
                let start = to_char(m.start());
                Match {
                    text: entry.text.clone(),
                    category: entry.category,
                    start,
                    end: start + self.char_lens[id] - 1,
                }
            })
            .collect()
    }

    /// Payload stored for an exact pattern text, if any.
    pub fn lookup(&self, text: &str) -> Option<&PatternEntry> {
        self.index.get(text).map(|&id| &self.entries[id])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &AutomatonStats {
        &self.stats
    }
}
