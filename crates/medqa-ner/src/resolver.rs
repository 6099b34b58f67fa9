//! Overlap resolution for raw automaton hits.
//!
//! Longer names are considered first because they are the more specific
//! identification ("慢性肺炎" over "肺炎"). Only full containment suppresses
//! a candidate; two mentions that merely intersect both survive.

use medqa_common::{EntityMention, Match};

/// Turn raw matches into a containment-free mention list ordered by `start`.
///
/// Deterministic for a given input order: ties on span length keep
/// discovery order, so of two identical spans the first one found wins.
pub fn resolve(matches: Vec<Match>) -> Vec<EntityMention> {
    if matches.is_empty() {
        return Vec::new();
    }

    let mut by_length = matches;
    // sort_by is stable
    by_length.sort_by(|a, b| b.span().cmp(&a.span()));

    let mut accepted: Vec<Match> = Vec::with_capacity(by_length.len());
    for candidate in by_length {
        if !accepted.iter().any(|kept| kept.contains(&candidate)) {
            accepted.push(candidate);
        }
    }

    accepted.sort_by_key(|m| m.start);
    accepted.into_iter().map(EntityMention::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medqa_common::Category;
    use pretty_assertions::assert_eq;

    fn m(text: &str, category: Category, start: usize, end: usize) -> Match {
        Match { text: text.to_string(), category, start, end }
    }

    #[test]
    fn test_longest_match_wins() {
        let out = resolve(vec![
            m("肺炎", Category::Disease, 5, 6),
            m("慢性肺炎", Category::Disease, 3, 6),
        ]);
        assert_eq!(out, vec![EntityMention::new("慢性肺炎", Category::Disease, 3)]);
    }

    #[test]
    fn test_partial_overlap_keeps_both() {
        // "AB" [0,1] and "BC" [1,2] intersect without containment.
        let out = resolve(vec![
            m("AB", Category::Symptom, 0, 1),
            m("BC", Category::Disease, 1, 2),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "AB");
        assert_eq!(out[1].text, "BC");
    }

    #[test]
    fn test_identical_spans_keep_first_discovered() {
        let out = resolve(vec![
            m("感冒", Category::Disease, 2, 3),
            m("感冒", Category::Symptom, 2, 3),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, Category::Disease);
    }

    #[test]
    fn test_output_is_left_to_right() {
        let out = resolve(vec![
            m("发烧", Category::Symptom, 10, 11),
            m("咳嗽伴有发烧", Category::Symptom, 20, 25),
            m("头晕", Category::Symptom, 0, 1),
        ]);
        let starts: Vec<usize> = out.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![0, 10, 20]);
    }

    #[test]
    fn test_no_mention_contains_another() {
        let out = resolve(vec![
            m("性肺", Category::Disease, 4, 5),
            m("肺炎", Category::Disease, 5, 6),
            m("慢性肺炎", Category::Disease, 3, 6),
            m("炎", Category::Symptom, 6, 6),
            m("肺炎咳嗽", Category::Symptom, 5, 8),
        ]);
        for (i, a) in out.iter().enumerate() {
            for (j, b) in out.iter().enumerate() {
                if i != j {
                    assert!(!(a.start <= b.start && a.end >= b.end), "{:?} contains {:?}", a, b);
                }
            }
        }
        // 慢性肺炎 and 肺炎咳嗽 partially overlap and both survive.
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_inverted_span_does_not_panic() {
        let out = resolve(vec![
            m("X", Category::Symptom, 9, 2),
            m("肺炎", Category::Disease, 5, 6),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "肺炎");
        assert_eq!(out[1].text, "X");
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve(Vec::new()).is_empty());
    }
}
