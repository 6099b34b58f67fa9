/// Core entity types mirroring the medical knowledge graph labels.
/// Spans are measured in characters, with an inclusive `end`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Closed set of node labels in the medical knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Disease,
    Symptom,
    Drug,
    Check,
    Department,
    Food,
    Producer,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Disease,
        Category::Symptom,
        Category::Drug,
        Category::Check,
        Category::Department,
        Category::Food,
        Category::Producer,
    ];

    /// Preference order used to pick the category that gates intent rules.
    /// Food and Producer are deliberately absent.
    pub const INTENT_PREFERENCE: [Category; 5] = [
        Category::Disease,
        Category::Symptom,
        Category::Drug,
        Category::Check,
        Category::Department,
    ];

    /// Preference order used to pick the entity that drives follow-up questions.
    pub const RECOMMENDATION_PREFERENCE: [Category; 7] = Category::ALL;

    /// Graph label, identical to the `type` field of the pattern source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Disease    => "Disease",
            Category::Symptom    => "Symptom",
            Category::Drug       => "Drug",
            Category::Check      => "Check",
            Category::Department => "Department",
            Category::Food       => "Food",
            Category::Producer   => "Producer",
        }
    }

    /// Parse a graph label. Matching ignores ASCII case so that `disease`
    /// and `DISEASE` records in hand-edited catalogues still load.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pattern entry
// ---------------------------------------------------------------------------

/// One dictionary record: an entity name and its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub text: String,
    pub category: Category,
}

impl PatternEntry {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self { text: text.into(), category }
    }

    /// Pattern length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

// ---------------------------------------------------------------------------
// Raw match and resolved mention
// ---------------------------------------------------------------------------

/// A raw automaton hit. `end = start + char_len(text) - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub text: String,
    pub category: Category,
    pub start: usize,
    pub end: usize,
}

impl Match {
    /// Span length (`end - start`), the sort key for overlap resolution.
    /// A hand-built match with `end < start` has span 0.
    pub fn span(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when `other` lies entirely inside this span. Equal spans contain each other.
    pub fn contains(&self, other: &Match) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}

/// A resolved entity mention: never contained by another mention of the same list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    pub text: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub start: usize,
    pub end: usize,
}

impl EntityMention {
    pub fn new(text: impl Into<String>, category: Category, start: usize) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self { end: start + len.saturating_sub(1), text, category, start }
    }

    /// Stable graph-side identifier used in recommendation payloads.
    pub fn kg_id(&self) -> String {
        format!("kg_id_{}_{}", self.category, self.text)
    }
}

impl From<Match> for EntityMention {
    fn from(m: Match) -> Self {
        Self { text: m.text, category: m.category, start: m.start, end: m.end }
    }
}

/// First mention whose category appears earliest in `preference`.
///
/// Categories absent from `preference` never win, even if they are the only
/// mentions present.
pub fn dominant_mention<'a>(
    mentions: &'a [EntityMention],
    preference: &[Category],
) -> Option<&'a EntityMention> {
    preference
        .iter()
        .find_map(|cat| mentions.iter().find(|m| m.category == *cat))
}
