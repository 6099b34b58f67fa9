//! Direct answers from the graph.
//!
//! Each answerable intent maps to one lookup on the main entity: either a
//! free-text node property or the list of nodes one hop away. The entity
//! must be of the category the intent is about; anything else gets a fixed
//! refusal line rather than a graph call.

use std::sync::Arc;
use std::time::Duration;

use medqa_common::{Category, EntityMention, RelevantEntity};
use medqa_intent::IntentLabel;
use serde::Serialize;
use tracing::{debug, warn};

use crate::oracle::GraphOracle;
use crate::relation::{HopProbe, NodeProperty, Relation};
use crate::{KgError, Result};

use Category::{Check, Department, Disease, Drug, Food, Producer, Symptom};
use IntentLabel as I;

/// Most hop targets listed in one answer.
pub const MAX_LISTED: usize = 20;

pub const WELCOME: &str = "您好！我是医疗问答机器人，请问有什么可以帮助您的？";
pub const NO_ENTITY: &str = "抱歉，我未能识别出您问题中的主要医疗实体，也无法理解您的意图。";
pub const LOOKUP_FAILED: &str = "抱歉，查询知识图谱时出现问题，请稍后再试。";

/// How an answer came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// The graph held the requested fact.
    Answered,
    /// The lookup ran and found nothing.
    NotFound,
    /// The intent is about a different entity category.
    WrongEntity,
    /// The intent has no graph lookup.
    NoLookup,
    Greeting,
    NoEntity,
    /// The lookup errored or timed out.
    LookupFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphAnswer {
    pub text: String,
    pub outcome: AnswerOutcome,
    /// The entity the answer is about, when one was used.
    pub entity: Option<RelevantEntity>,
}

#[derive(Debug, Clone, Copy)]
enum Lookup {
    Property(NodeProperty),
    Hop(HopProbe),
}

/// One answerable intent. Templates use `{name}` and `{value}`.
#[derive(Debug, Clone, Copy)]
pub struct AnswerRule {
    pub intent: IntentLabel,
    pub subject: Category,
    /// What is being asked for, as it reads in a refusal.
    pub topic: &'static str,
    lookup: Lookup,
    found: &'static str,
    missing: &'static str,
}

const fn property(
    intent: IntentLabel,
    property: NodeProperty,
    topic: &'static str,
    found: &'static str,
    missing: &'static str,
) -> AnswerRule {
    AnswerRule { intent, subject: Disease, topic, lookup: Lookup::Property(property), found, missing }
}

const fn hop(
    intent: IntentLabel,
    probe: HopProbe,
    topic: &'static str,
    found: &'static str,
    missing: &'static str,
) -> AnswerRule {
    AnswerRule { intent, subject: probe.anchor, topic, lookup: Lookup::Hop(probe), found, missing }
}

const fn out(anchor: Category, rels: &'static [Relation], target: Category) -> HopProbe {
    HopProbe::outgoing(anchor, rels, target)
}

const fn inc(anchor: Category, rels: &'static [Relation], target: Category) -> HopProbe {
    HopProbe::incoming(anchor, rels, target)
}

pub const ANSWER_RULES: &[AnswerRule] = &[
    // Disease properties
    property(I::QueryDesc, NodeProperty::Desc, "描述",
        "{name}的描述是：{value}。", "抱歉，未能找到{name}的描述信息。"),
    property(I::QueryPrevent, NodeProperty::Prevent, "预防方法",
        "{name}的预防方法是：{value}。", "抱歉，未能找到{name}的预防方法信息。"),
    property(I::QueryCause, NodeProperty::Cause, "病因",
        "{name}的病因是：{value}。", "抱歉，未能找到{name}的病因信息。"),
    property(I::QueryEasyGet, NodeProperty::EasyGet, "易感人群",
        "{name}的易感人群是：{value}。", "抱歉，未能找到{name}的易感人群信息。"),
    property(I::QueryCureLasttime, NodeProperty::CureLasttime, "治疗持续时间",
        "{name}的治疗持续时间是：{value}。", "抱歉，未能找到{name}的治疗持续时间信息。"),
    property(I::QueryCuredProb, NodeProperty::CuredProb, "治愈概率",
        "{name}的治愈概率是：{value}。", "抱歉，未能找到{name}的治愈概率信息。"),
    property(I::QueryCureWay, NodeProperty::CureWay, "治疗方式",
        "{name}的治疗方法包括：{value}。", "抱歉，未能找到{name}的治疗方法信息。"),
    // Disease hops
    hop(I::QuerySymptom, out(Disease, &[Relation::HasSymptom], Symptom), "症状",
        "{name}的常见症状有：{value}。", "抱歉，未能找到{name}的症状信息。"),
    hop(I::QueryAcompanyDisease, out(Disease, &[Relation::AcompanyWith], Disease), "并发症",
        "{name}可能伴随的并发症有：{value}。", "抱歉，未能找到{name}的并发症信息。"),
    hop(I::QueryBelongsToDepartment, out(Disease, &[Relation::BelongsTo], Department), "所属科室",
        "{name}通常属于：{value}。", "抱歉，未能找到{name}所属的科室信息。"),
    hop(I::QueryRecommandDrug, out(Disease, &[Relation::RecommandDrug], Drug), "推荐药品",
        "{name}推荐的药品有：{value}。", "抱歉，未能找到{name}的推荐药品信息。"),
    hop(I::QueryCommonDrug, out(Disease, &[Relation::CommonDrug], Drug), "常用药品",
        "{name}常用的药品有：{value}。", "抱歉，未能找到{name}的常用药品信息。"),
    hop(I::QueryNoEat, out(Disease, &[Relation::NoEat], Food), "忌吃食物",
        "{name}忌吃的食物有：{value}。", "抱歉，未能找到{name}忌吃的食物信息。"),
    hop(I::QueryDoEat, out(Disease, &[Relation::DoEat], Food), "宜吃食物",
        "{name}宜吃的食物有：{value}。", "抱歉，未能找到{name}宜吃的食物信息。"),
    hop(I::QueryRecommandEat, out(Disease, &[Relation::RecommandEat], Food), "推荐食谱",
        "{name}推荐的食谱有：{value}。", "抱歉，未能找到{name}的推荐食谱信息。"),
    hop(I::QueryNeedCheck, out(Disease, &[Relation::NeedCheck], Check), "诊断检查",
        "{name}需要做的检查有：{value}。", "抱歉，未能找到{name}的检查信息。"),
    // Other anchors
    hop(I::QueryDrugProducer, inc(Drug, &[Relation::Produces], Producer), "生产厂家",
        "{name}的生产厂家是：{value}。", "抱歉，未能找到{name}的生产厂家信息。"),
    hop(I::QueryDrugEffectDisease,
        inc(Drug, &[Relation::CommonDrug, Relation::RecommandDrug], Disease), "治疗疾病",
        "{name}常用于治疗/推荐用于治疗：{value}等疾病。", "抱歉，未能找到{name}可以治疗的疾病信息。"),
    hop(I::QuerySymptomDisease, inc(Symptom, &[Relation::HasSymptom], Disease), "相关疾病",
        "{name}可能是以下疾病的症状：{value}。", "抱歉，未能找到以{name}为症状的疾病信息。"),
    hop(I::QueryCheckDiagnoseDisease, inc(Check, &[Relation::NeedCheck], Disease), "诊断疾病",
        "{name}可以用于诊断：{value}等疾病。", "抱歉，未能找到{name}可以诊断的疾病信息。"),
    hop(I::QueryDepartmentSubdepartment,
        out(Department, &[Relation::BelongsTo], Department), "下属科室",
        "{name}下属的科室有：{value}。", "抱歉，未能找到{name}下属的科室信息。"),
];

pub fn rule_for(intent: IntentLabel) -> Option<&'static AnswerRule> {
    ANSWER_RULES.iter().find(|r| r.intent == intent)
}

/// Noun used for a category in refusals.
fn category_noun(category: Category) -> &'static str {
    match category {
        Disease    => "疾病",
        Symptom    => "症状",
        Drug       => "药物",
        Check      => "检查",
        Department => "科室",
        Food       => "食物",
        Producer   => "生产商",
    }
}

impl GraphAnswer {
    fn plain(text: impl Into<String>, outcome: AnswerOutcome) -> Self {
        Self { text: text.into(), outcome, entity: None }
    }

    fn about(text: String, outcome: AnswerOutcome, entity: &EntityMention) -> Self {
        Self { text, outcome, entity: Some(RelevantEntity::from(entity)) }
    }
}

pub struct GraphAnswerer {
    oracle: Arc<dyn GraphOracle>,
    lookup_timeout: Duration,
}

impl GraphAnswerer {
    pub fn new(oracle: Arc<dyn GraphOracle>, lookup_timeout: Duration) -> Self {
        Self { oracle, lookup_timeout }
    }

    /// Answer `intent` about the main entity. Never fails: lookup errors
    /// become an apology with [`AnswerOutcome::LookupFailed`].
    pub async fn answer(&self, main: Option<&EntityMention>, intent: IntentLabel) -> GraphAnswer {
        if intent.is_greeting() {
            return GraphAnswer::plain(WELCOME, AnswerOutcome::Greeting);
        }
        let Some(entity) = main else {
            return GraphAnswer::plain(NO_ENTITY, AnswerOutcome::NoEntity);
        };
        let name = entity.text.as_str();

        let Some(rule) = rule_for(intent) else {
            let text = if intent == I::UnknownIntent {
                format!("抱歉，我识别出了实体 '{}' 但未能明确您的意图，请尝试换种问法。", name)
            } else {
                format!(
                    "我识别出了实体 '{}' 和意图 '{}'，但目前还没有针对该意图的图谱回答。",
                    name, intent
                )
            };
            return GraphAnswer::about(text, AnswerOutcome::NoLookup, entity);
        };

        if entity.category != rule.subject {
            let text = format!(
                "抱歉，只有{}实体支持查询{}。",
                category_noun(rule.subject),
                rule.topic
            );
            return GraphAnswer::about(text, AnswerOutcome::WrongEntity, entity);
        }

        match tokio::time::timeout(self.lookup_timeout, self.lookup(rule, name)).await {
            Ok(Ok(Some(value))) => {
                debug!(entity = name, %intent, "Graph answer found");
                let text = rule.found.replace("{name}", name).replace("{value}", &value);
                GraphAnswer::about(text, AnswerOutcome::Answered, entity)
            }
            Ok(Ok(None)) => {
                GraphAnswer::about(rule.missing.replace("{name}", name), AnswerOutcome::NotFound, entity)
            }
            Ok(Err(e)) => {
                warn!(entity = name, %intent, "Graph answer lookup failed: {}", e);
                GraphAnswer::about(LOOKUP_FAILED.to_string(), AnswerOutcome::LookupFailed, entity)
            }
            Err(_) => {
                let err = KgError::Timeout(self.lookup_timeout.as_millis() as u64);
                warn!(entity = name, %intent, "{}", err);
                GraphAnswer::about(LOOKUP_FAILED.to_string(), AnswerOutcome::LookupFailed, entity)
            }
        }
    }

    /// Rendered value, or `None` when the graph has nothing.
    async fn lookup(&self, rule: &AnswerRule, name: &str) -> Result<Option<String>> {
        match rule.lookup {
            Lookup::Property(property) => {
                self.oracle.node_property(name, rule.subject, property).await
            }
            Lookup::Hop(ref probe) => {
                let names = self.oracle.hop_targets(name, probe, MAX_LISTED).await?;
                Ok((!names.is_empty()).then(|| names.join("、")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{GraphNode, InMemoryGraph};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn graph() -> InMemoryGraph {
        let mut g = InMemoryGraph::new();
        g.add_node(
            GraphNode::new("感冒", Disease)
                .with(NodeProperty::Desc, json!("一种常见的上呼吸道感染"))
                .with(NodeProperty::CureWay, json!(["多休息", "多喝水"]))
                .with(NodeProperty::CuredProb, json!("95%")),
        );
        g.relate(("感冒", Disease), Relation::HasSymptom, ("咳嗽", Symptom))
            .relate(("感冒", Disease), Relation::CommonDrug, ("感冒药", Drug))
            .relate(("流感", Disease), Relation::RecommandDrug, ("感冒药", Drug))
            .relate(("哈药集团", Producer), Relation::Produces, ("感冒药", Drug))
            .relate(("内科", Department), Relation::BelongsTo, ("呼吸内科", Department));
        g
    }

    fn answerer(g: InMemoryGraph) -> GraphAnswerer {
        GraphAnswerer::new(Arc::new(g), Duration::from_millis(200))
    }

    fn mention(text: &str, category: Category) -> EntityMention {
        EntityMention::new(text, category, 0)
    }

    #[test]
    fn test_one_rule_per_intent() {
        for (i, rule) in ANSWER_RULES.iter().enumerate() {
            assert!(
                ANSWER_RULES[i + 1..].iter().all(|r| r.intent != rule.intent),
                "duplicate rule for {}",
                rule.intent
            );
            assert!(rule.found.contains("{value}"), "{}", rule.intent);
            assert!(rule.missing.contains("{name}"), "{}", rule.intent);
        }
        assert!(rule_for(I::QueryDrugSideEffect).is_none());
        assert!(rule_for(I::Greeting).is_none());
    }

    #[tokio::test]
    async fn test_disease_property_answer() {
        let a = answerer(graph());
        let e = mention("感冒", Disease);
        let out = a.answer(Some(&e), I::QueryDesc).await;
        assert_eq!(out.outcome, AnswerOutcome::Answered);
        assert_eq!(out.text, "感冒的描述是：一种常见的上呼吸道感染。");
        assert_eq!(out.entity.unwrap().id, "kg_id_Disease_感冒");

        let out = a.answer(Some(&e), I::QueryCuredProb).await;
        assert_eq!(out.text, "感冒的治愈概率是：95%。");

        let out = a.answer(Some(&e), I::QueryCureWay).await;
        assert_eq!(out.text, "感冒的治疗方法包括：多休息；多喝水。");
    }

    #[tokio::test]
    async fn test_missing_property_is_not_found() {
        let a = answerer(graph());
        let out = a.answer(Some(&mention("感冒", Disease)), I::QueryEasyGet).await;
        assert_eq!(out.outcome, AnswerOutcome::NotFound);
        assert_eq!(out.text, "抱歉，未能找到感冒的易感人群信息。");
    }

    #[tokio::test]
    async fn test_hop_answers_list_targets() {
        let a = answerer(graph());
        let out = a.answer(Some(&mention("感冒", Disease)), I::QuerySymptom).await;
        assert_eq!(out.text, "感冒的常见症状有：咳嗽。");

        let out = a.answer(Some(&mention("感冒药", Drug)), I::QueryDrugProducer).await;
        assert_eq!(out.text, "感冒药的生产厂家是：哈药集团。");

        let out = a.answer(Some(&mention("感冒药", Drug)), I::QueryDrugEffectDisease).await;
        let mut diseases = vec!["感冒", "流感"];
        diseases.sort();
        assert_eq!(out.text, format!("感冒药常用于治疗/推荐用于治疗：{}等疾病。", diseases.join("、")));

        let out = a.answer(Some(&mention("内科", Department)), I::QueryDepartmentSubdepartment).await;
        assert_eq!(out.text, "内科下属的科室有：呼吸内科。");
    }

    #[tokio::test]
    async fn test_empty_hop_is_not_found() {
        let a = answerer(graph());
        let out = a.answer(Some(&mention("感冒", Disease)), I::QueryNoEat).await;
        assert_eq!(out.outcome, AnswerOutcome::NotFound);
        assert_eq!(out.text, "抱歉，未能找到感冒忌吃的食物信息。");
    }

    #[tokio::test]
    async fn test_wrong_entity_category_is_refused() {
        let a = answerer(graph());
        let out = a.answer(Some(&mention("咳嗽", Symptom)), I::QueryPrevent).await;
        assert_eq!(out.outcome, AnswerOutcome::WrongEntity);
        assert_eq!(out.text, "抱歉，只有疾病实体支持查询预防方法。");

        let out = a.answer(Some(&mention("感冒", Disease)), I::QueryDrugProducer).await;
        assert_eq!(out.text, "抱歉，只有药物实体支持查询生产厂家。");
    }

    #[tokio::test]
    async fn test_fixed_replies() {
        let a = answerer(graph());
        let e = mention("感冒", Disease);

        let out = a.answer(Some(&e), I::Greeting).await;
        assert_eq!((out.text.as_str(), out.outcome), (WELCOME, AnswerOutcome::Greeting));

        let out = a.answer(None, I::UnknownIntent).await;
        assert_eq!((out.text.as_str(), out.outcome), (NO_ENTITY, AnswerOutcome::NoEntity));

        let out = a.answer(Some(&e), I::UnknownIntent).await;
        assert_eq!(out.outcome, AnswerOutcome::NoLookup);
        assert!(out.text.contains("'感冒'"));

        let out = a.answer(Some(&mention("阿莫西林", Drug)), I::QueryDrugSideEffect).await;
        assert_eq!(out.outcome, AnswerOutcome::NoLookup);
        assert!(out.text.contains("query_drug_side_effect"));
    }

    /// Never answers in time.
    struct StalledGraph;

    #[async_trait]
    impl GraphOracle for StalledGraph {
        async fn hop_exists(&self, _name: &str, _probe: &HopProbe) -> Result<bool> {
            Ok(false)
        }

        async fn hop_targets(&self, _name: &str, _probe: &HopProbe, _limit: usize) -> Result<Vec<String>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }

        async fn node_property(
            &self,
            _name: &str,
            _category: Category,
            _property: NodeProperty,
        ) -> Result<Option<String>> {
            Err(KgError::UnexpectedResponse("connection reset".into()))
        }

        fn backend_name(&self) -> &'static str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn test_lookup_failures_become_apology() {
        let a = GraphAnswerer::new(Arc::new(StalledGraph), Duration::from_millis(20));
        let e = mention("感冒", Disease);

        let out = a.answer(Some(&e), I::QuerySymptom).await;
        assert_eq!((out.text.as_str(), out.outcome), (LOOKUP_FAILED, AnswerOutcome::LookupFailed));

        let out = a.answer(Some(&e), I::QueryCause).await;
        assert_eq!(out.outcome, AnswerOutcome::LookupFailed);
    }
}
