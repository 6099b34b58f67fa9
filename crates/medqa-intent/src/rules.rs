//! Ordered intent rule table.
//!
//! Rules are evaluated top to bottom; the first rule with a keyword hit whose
//! gate admits the dominant category decides the intent. Order matters where
//! keywords are shared: `用药` belongs to both the drug recommendation and the
//! cure-way rule, and `禁忌` to both side effects and food restrictions.

use medqa_common::Category;

use crate::label::IntentLabel;

/// Which dominant entity categories a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Any,
    Only(&'static [Category]),
}

impl Gate {
    /// `None` means the query had no gating entity (no mentions, or only Food/Producer).
    pub fn admits(&self, dominant: Option<Category>) -> bool {
        match self {
            Gate::Any => true,
            Gate::Only(allowed) => dominant.is_some_and(|c| allowed.contains(&c)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub label: IntentLabel,
    pub keywords: &'static [&'static str],
    pub gate: Gate,
}

const DISEASE: &[Category] = &[Category::Disease];
const DISEASE_OR_SYMPTOM: &[Category] = &[Category::Disease, Category::Symptom];
const DRUG_OR_DISEASE: &[Category] = &[Category::Drug, Category::Disease];
const DRUG_OR_PRODUCER: &[Category] = &[Category::Drug, Category::Producer];
const SYMPTOM: &[Category] = &[Category::Symptom];
const CHECK: &[Category] = &[Category::Check];
const DEPARTMENT: &[Category] = &[Category::Department];

const fn rule(label: IntentLabel, keywords: &'static [&'static str], gate: Gate) -> IntentRule {
    IntentRule { label, keywords, gate }
}

/// Greeting is handled before entity gating; it stays in the table so that
/// the full taxonomy is visible in one place.
pub const RULES: &[IntentRule] = &[
    rule(IntentLabel::Greeting, &["你好", "您好", "hello", "在吗", "hi", "喂"], Gate::Any),
    rule(IntentLabel::QueryDrugProducer, &["厂家", "生产商", "哪个厂", "生产"], Gate::Only(DRUG_OR_PRODUCER)),
    rule(IntentLabel::QueryDrugSideEffect, &["副作用", "不良反应", "危害", "禁忌"], Gate::Only(DRUG_OR_DISEASE)),
    rule(IntentLabel::QueryDrugEffectDisease, &["治疗哪些病", "治什么病", "有什么疗效"], Gate::Only(DRUG_OR_DISEASE)),
    rule(IntentLabel::QueryCheckDiagnoseDisease, &["诊断什么病", "查出什么病", "能查出什么", "确诊"], Gate::Only(CHECK)),
    rule(IntentLabel::QuerySymptomDisease, &["可能是", "什么病", "得了什么", "会是什么病", "诊断为"], Gate::Only(SYMPTOM)),
    rule(IntentLabel::QueryRecommandDrug, &["推荐药", "什么药好", "好药", "用药", "吃什么药"], Gate::Only(DRUG_OR_DISEASE)),
    rule(IntentLabel::QueryCommonDrug, &["常用药"], Gate::Only(DRUG_OR_DISEASE)),
    rule(IntentLabel::QueryNoEat, &["不能吃", "忌口", "禁忌", "不宜吃", "什么不能吃"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryDoEat, &["可以吃", "吃什么好", "宜吃", "吃什么对", "适合吃什么"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryRecommandEat, &["食谱", "推荐吃", "膳食"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryNeedCheck, &["检查", "做哪些检查", "需要检查吗", "怎么检查"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryBelongsToDepartment, &["科室", "看哪个", "挂什么号", "去哪个科", "哪个科室"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryAcompanyDisease, &["并发症", "伴随", "引起什么病", "还有什么病", "同时得"], Gate::Only(DISEASE)),
    rule(
        IntentLabel::QueryCureWay,
        &["治疗", "怎么办", "怎么治", "如何治疗", "用药", "吃什么药", "怎么医治", "方法"],
        Gate::Only(DISEASE_OR_SYMPTOM),
    ),
    rule(IntentLabel::QueryCause, &["原因", "引起", "导致", "为什么会得", "怎么来的"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryPrevent, &["预防", "避免", "怎么防止", "如何预防"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryEasyGet, &["人群", "易感", "哪些人", "谁会得", "哪些人容易得"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryCureLasttime, &["多久", "时间", "多长", "持续多久"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryCuredProb, &["概率", "治愈率", "能治好吗", "痊愈可能性"], Gate::Only(DISEASE)),
    rule(IntentLabel::QuerySymptom, &["症状", "表现", "有什么症状", "什么表现"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryDesc, &["是什么", "什么是", "解释一下", "定义"], Gate::Only(DISEASE)),
    rule(IntentLabel::QueryDepartmentSubdepartment, &["下属科室", "有哪些科室", "分科"], Gate::Only(DEPARTMENT)),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_query_label_has_exactly_one_rule() {
        let labels: HashSet<IntentLabel> = RULES.iter().map(|r| r.label).collect();
        assert_eq!(labels.len(), RULES.len());
        assert_eq!(RULES.len(), 23);
        assert!(!labels.contains(&IntentLabel::UnknownIntent));
        assert_eq!(RULES[0].label, IntentLabel::Greeting);
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for r in RULES {
            for kw in r.keywords {
                assert_eq!(kw.to_lowercase(), *kw, "{} keyword {}", r.label, kw);
            }
        }
    }

    #[test]
    fn test_gate_admits() {
        assert!(Gate::Any.admits(None));
        assert!(Gate::Only(DRUG_OR_DISEASE).admits(Some(Category::Drug)));
        assert!(!Gate::Only(DRUG_OR_DISEASE).admits(Some(Category::Symptom)));
        assert!(!Gate::Only(DISEASE).admits(None));
    }
}
