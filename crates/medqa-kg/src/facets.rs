//! Follow-up question facets per entity category.
//!
//! A facet is offered when its probe hits and the user has not already asked
//! about that aspect (the current intent is not in `skip_intents`).

use medqa_common::Category;
use medqa_intent::IntentLabel;

use crate::relation::{HopProbe, NodeProperty, Relation};

use Category::{Check, Department, Disease, Drug, Food, Producer, Symptom};
use IntentLabel as I;

// ---------------------------------------------------------------------------
// Relevance scores
// ---------------------------------------------------------------------------

pub const SCORE_DISEASE_SYMPTOMS: f64 = 0.90;
pub const SCORE_DISEASE_CURE_WAY: f64 = 0.88;
pub const SCORE_DISEASE_DRUGS: f64 = 0.85;
pub const SCORE_DISEASE_COMPLICATIONS: f64 = 0.82;
pub const SCORE_DISEASE_DEPARTMENT: f64 = 0.80;
pub const SCORE_DISEASE_FOOD: f64 = 0.78;
pub const SCORE_DISEASE_CHECKS: f64 = 0.75;
pub const SCORE_DISEASE_PREVENT: f64 = 0.72;
pub const SCORE_DISEASE_CAUSE: f64 = 0.70;

pub const SCORE_SYMPTOM_DISEASES: f64 = 0.90;
pub const SCORE_SYMPTOM_ALLEVIATE: f64 = 0.85;

pub const SCORE_DRUG_DISEASES: f64 = 0.90;
pub const SCORE_DRUG_PRODUCER: f64 = 0.80;

pub const SCORE_CHECK_DISEASES: f64 = 0.85;

pub const SCORE_DEPARTMENT_SUBDEPARTMENTS: f64 = 0.80;
pub const SCORE_DEPARTMENT_DISEASES: f64 = 0.75;

pub const SCORE_GENERAL_DISEASES: f64 = 0.70;
pub const SCORE_GENERAL_SYMPTOMS: f64 = 0.65;
pub const SCORE_GENERAL_DRUGS: f64 = 0.60;

pub const SCORE_FILLER_ENTITY: f64 = 0.60;
pub const SCORE_FILLER_MORE: f64 = 0.50;
pub const SCORE_FILLER_FINAL: f64 = 0.40;

// ---------------------------------------------------------------------------
// Facet table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum FacetProbe {
    Hop(HopProbe),
    Property(NodeProperty),
    /// Offered without consulting the graph.
    Always,
}

#[derive(Debug, Clone, Copy)]
pub struct Facet {
    pub category: Category,
    pub probe: FacetProbe,
    pub skip_intents: &'static [IntentLabel],
    pub score: f64,
    /// Question text; `{name}` is replaced by the entity name.
    pub template: &'static str,
    pub id_suffix: &'static str,
}

impl Facet {
    pub fn question_text(&self, name: &str) -> String {
        self.template.replace("{name}", name)
    }

    pub fn question_id(&self, name: &str) -> String {
        format!("{}_{}", name, self.id_suffix)
    }

    pub fn applies_to(&self, category: Category, intent: IntentLabel) -> bool {
        self.category == category && !self.skip_intents.contains(&intent)
    }
}

const fn hop_out(anchor: Category, rels: &'static [Relation], target: Category) -> FacetProbe {
    FacetProbe::Hop(HopProbe::outgoing(anchor, rels, target))
}

const fn hop_in(anchor: Category, rels: &'static [Relation], target: Category) -> FacetProbe {
    FacetProbe::Hop(HopProbe::incoming(anchor, rels, target))
}

const DRUG_RELATIONS: &[Relation] = &[Relation::RecommandDrug, Relation::CommonDrug];
const FOOD_RELATIONS: &[Relation] = &[Relation::DoEat, Relation::NoEat, Relation::RecommandEat];

/// Probe order within a category is the order questions are generated in.
pub const FACETS: &[Facet] = &[
    // Disease
    Facet {
        category: Disease,
        probe: hop_out(Disease, &[Relation::HasSymptom], Symptom),
        skip_intents: &[I::QuerySymptom],
        score: SCORE_DISEASE_SYMPTOMS,
        template: "{name}的常见症状有哪些？",
        id_suffix: "symptoms",
    },
    Facet {
        category: Disease,
        probe: FacetProbe::Property(NodeProperty::CureWay),
        skip_intents: &[I::QueryCureWay],
        score: SCORE_DISEASE_CURE_WAY,
        template: "{name}有哪些治疗方法？",
        id_suffix: "cure_way",
    },
    Facet {
        category: Disease,
        probe: hop_out(Disease, DRUG_RELATIONS, Drug),
        skip_intents: &[I::QueryRecommandDrug, I::QueryCommonDrug],
        score: SCORE_DISEASE_DRUGS,
        template: "{name}推荐/常用什么药？",
        id_suffix: "drugs",
    },
    Facet {
        category: Disease,
        probe: hop_out(Disease, &[Relation::AcompanyWith], Disease),
        skip_intents: &[I::QueryAcompanyDisease],
        score: SCORE_DISEASE_COMPLICATIONS,
        template: "{name}会引起哪些并发症？",
        id_suffix: "complications",
    },
    Facet {
        category: Disease,
        probe: hop_out(Disease, &[Relation::BelongsTo], Department),
        skip_intents: &[I::QueryBelongsToDepartment],
        score: SCORE_DISEASE_DEPARTMENT,
        template: "{name}应该挂什么科？",
        id_suffix: "department",
    },
    Facet {
        category: Disease,
        probe: hop_out(Disease, FOOD_RELATIONS, Food),
        skip_intents: &[I::QueryDoEat, I::QueryNoEat, I::QueryRecommandEat],
        score: SCORE_DISEASE_FOOD,
        template: "{name}患者饮食上有什么禁忌或推荐？",
        id_suffix: "food",
    },
    Facet {
        category: Disease,
        probe: hop_out(Disease, &[Relation::NeedCheck], Check),
        skip_intents: &[I::QueryNeedCheck],
        score: SCORE_DISEASE_CHECKS,
        template: "诊断{name}需要做哪些检查？",
        id_suffix: "checks",
    },
    Facet {
        category: Disease,
        probe: FacetProbe::Property(NodeProperty::Prevent),
        skip_intents: &[I::QueryPrevent],
        score: SCORE_DISEASE_PREVENT,
        template: "{name}如何预防？",
        id_suffix: "prevent",
    },
    Facet {
        category: Disease,
        probe: FacetProbe::Property(NodeProperty::Cause),
        skip_intents: &[I::QueryCause],
        score: SCORE_DISEASE_CAUSE,
        template: "{name}的病因是什么？",
        id_suffix: "cause",
    },
    // Symptom
    Facet {
        category: Symptom,
        probe: hop_in(Symptom, &[Relation::HasSymptom], Disease),
        skip_intents: &[I::QuerySymptomDisease],
        score: SCORE_SYMPTOM_DISEASES,
        template: "{name}可能是哪些疾病的症状？",
        id_suffix: "related_diseases",
    },
    Facet {
        category: Symptom,
        probe: FacetProbe::Always,
        skip_intents: &[I::QueryCureWay],
        score: SCORE_SYMPTOM_ALLEVIATE,
        template: "{name}应该如何缓解或治疗？",
        id_suffix: "alleviate",
    },
    // Drug
    Facet {
        category: Drug,
        probe: hop_in(Drug, DRUG_RELATIONS, Disease),
        skip_intents: &[I::QueryDrugEffectDisease, I::QueryRecommandDrug, I::QueryCommonDrug],
        score: SCORE_DRUG_DISEASES,
        template: "{name}主要治疗哪些疾病？",
        id_suffix: "treat_diseases",
    },
    Facet {
        category: Drug,
        probe: hop_in(Drug, &[Relation::Produces], Producer),
        skip_intents: &[I::QueryDrugProducer],
        score: SCORE_DRUG_PRODUCER,
        template: "{name}是哪个药厂生产的？",
        id_suffix: "producer",
    },
    // Check
    Facet {
        category: Check,
        probe: hop_in(Check, &[Relation::NeedCheck], Disease),
        skip_intents: &[I::QueryCheckDiagnoseDisease],
        score: SCORE_CHECK_DISEASES,
        template: "{name}可以诊断哪些疾病？",
        id_suffix: "diagnose_diseases",
    },
    // Department
    Facet {
        category: Department,
        probe: hop_out(Department, &[Relation::BelongsTo], Department),
        skip_intents: &[I::QueryDepartmentSubdepartment],
        score: SCORE_DEPARTMENT_SUBDEPARTMENTS,
        template: "{name}下面包含哪些细分科室？",
        id_suffix: "subdepartments",
    },
    Facet {
        category: Department,
        probe: hop_in(Department, &[Relation::BelongsTo], Disease),
        skip_intents: &[I::QueryBelongsToDepartment],
        score: SCORE_DEPARTMENT_DISEASES,
        template: "哪些疾病属于{name}？",
        id_suffix: "diseases_in_dept",
    },
];

/// Facets to probe for an entity of `category` under the current `intent`.
pub fn applicable(category: Category, intent: IntentLabel) -> impl Iterator<Item = &'static Facet> {
    FACETS.iter().filter(move |f| f.applies_to(category, intent))
}

// ---------------------------------------------------------------------------
// Generic questions
// ---------------------------------------------------------------------------

/// Entity-free question offered when no entity drives recommendations.
#[derive(Debug, Clone, Copy)]
pub struct GeneralQuestion {
    pub text: &'static str,
    pub id: &'static str,
    pub score: f64,
}

pub const GENERAL_QUESTIONS: [GeneralQuestion; 3] = [
    GeneralQuestion { text: "您可以问我关于哪些疾病的信息？", id: "general_q_1", score: SCORE_GENERAL_DISEASES },
    GeneralQuestion { text: "我能查询哪些症状的信息？", id: "general_q_2", score: SCORE_GENERAL_SYMPTOMS },
    GeneralQuestion { text: "有哪些常见的药物？", id: "general_q_3", score: SCORE_GENERAL_DRUGS },
];

pub const FILLER_DISEASE_TEMPLATE: &str = "关于{name}，您还想了解什么？";
pub const FILLER_DISEASE_ID: &str = "general_disease_q";
pub const FILLER_ENTITY_TEMPLATE: &str = "关于{name}，您想了解哪些信息？";
pub const FILLER_ENTITY_ID: &str = "general_entity_q";
pub const FILLER_MORE: GeneralQuestion =
    GeneralQuestion { text: "还有其他关于医药方面的问题吗？", id: "general_q_more", score: SCORE_FILLER_MORE };
pub const FILLER_FINAL: GeneralQuestion =
    GeneralQuestion { text: "我能为您提供哪些帮助？", id: "final_general_q", score: SCORE_FILLER_FINAL };
