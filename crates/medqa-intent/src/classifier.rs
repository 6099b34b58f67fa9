use medqa_common::{dominant_mention, Category, EntityMention};
use tracing::debug;

use crate::label::IntentLabel;
use crate::rules::{IntentRule, RULES};

/// Category that gates intent rules. Food and Producer never qualify.
pub fn dominant_category(mentions: &[EntityMention]) -> Option<Category> {
    dominant_mention(mentions, &Category::INTENT_PREFERENCE).map(|m| m.category)
}

/// Pick exactly one intent for `text` given its resolved mentions.
///
/// Total and pure: the same input always yields the same label, and
/// anything unmatched falls through to [`IntentLabel::UnknownIntent`].
pub fn classify(text: &str, mentions: &[EntityMention]) -> IntentLabel {
    let lowered = text.to_lowercase();

    if keyword_hit(&RULES[0], &lowered) {
        return IntentLabel::Greeting;
    }
    if mentions.is_empty() {
        return IntentLabel::UnknownIntent;
    }

    let dominant = dominant_category(mentions);
    for rule in &RULES[1..] {
        if !keyword_hit(rule, &lowered) {
            continue;
        }
        if rule.gate.admits(dominant) {
            return rule.label;
        }
        debug!(intent = %rule.label, ?dominant, "Keyword hit rejected by category gate");
    }

    IntentLabel::UnknownIntent
}

fn keyword_hit(rule: &IntentRule, lowered: &str) -> bool {
    rule.keywords.iter().any(|kw| lowered.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medqa_ner::EntityExtractor;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> IntentLabel {
        let ex = EntityExtractor::with_embedded().unwrap();
        classify(text, &ex.extract(text))
    }

    fn mention(text: &str, category: Category) -> EntityMention {
        EntityMention::new(text, category, 0)
    }

    #[test]
    fn test_greeting_has_priority() {
        assert_eq!(run("你好，我胃痛"), IntentLabel::Greeting);
        assert_eq!(run("Hello"), IntentLabel::Greeting);
        assert_eq!(classify("在吗", &[]), IntentLabel::Greeting);
    }

    #[test]
    fn test_no_entities_falls_back_to_unknown() {
        assert_eq!(classify("怎么治疗比较好", &[]), IntentLabel::UnknownIntent);
        assert_eq!(classify("", &[]), IntentLabel::UnknownIntent);
    }

    #[test]
    fn test_producer_only_query_is_gated_out() {
        assert_eq!(run("华北制药的副作用是什么？"), IntentLabel::UnknownIntent);
    }

    #[test]
    fn test_food_only_query_is_gated_out() {
        assert_eq!(run("辣椒有什么危害"), IntentLabel::UnknownIntent);
    }

    #[test]
    fn test_disease_intents() {
        assert_eq!(run("高血压有什么症状"), IntentLabel::QuerySymptom);
        assert_eq!(run("糖尿病是什么原因导致的"), IntentLabel::QueryCause);
        assert_eq!(run("如何预防流感"), IntentLabel::QueryPrevent);
        assert_eq!(run("胃炎应该挂什么号"), IntentLabel::QueryBelongsToDepartment);
        assert_eq!(run("肝炎不能吃什么"), IntentLabel::QueryNoEat);
    }

    #[test]
    fn test_shared_keyword_resolved_by_priority() {
        // 吃什么药 belongs to both drug recommendation and cure way.
        assert_eq!(run("感冒吃什么药"), IntentLabel::QueryRecommandDrug);
        // 禁忌 belongs to both side effects and food restrictions.
        assert_eq!(run("阿莫西林有什么禁忌"), IntentLabel::QueryDrugSideEffect);
    }

    #[test]
    fn test_symptom_intents() {
        assert_eq!(run("头晕可能是什么病"), IntentLabel::QuerySymptomDisease);
        assert_eq!(run("咳嗽怎么治"), IntentLabel::QueryCureWay);
        // Disease-only rule skipped for a symptom; nothing else matches.
        assert_eq!(run("头晕的症状"), IntentLabel::UnknownIntent);
    }

    #[test]
    fn test_drug_check_department_intents() {
        assert_eq!(run("阿莫西林是哪个厂生产的"), IntentLabel::QueryDrugProducer);
        assert_eq!(run("心电图能查出什么病"), IntentLabel::QueryCheckDiagnoseDisease);
        assert_eq!(run("内科有哪些科室"), IntentLabel::QueryDepartmentSubdepartment);
    }

    #[test]
    fn test_dominant_category_uses_preference_not_position() {
        let mentions = vec![mention("布洛芬", Category::Drug), mention("感冒", Category::Disease)];
        assert_eq!(dominant_category(&mentions), Some(Category::Disease));
        assert_eq!(classify("布洛芬对感冒有什么症状缓解", &mentions), IntentLabel::QuerySymptom);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let q = "慢性肺炎吃什么药，会有并发症吗";
        let first = run(q);
        for _ in 0..10 {
            assert_eq!(run(q), first);
        }
    }
}
