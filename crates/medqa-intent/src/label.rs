use serde::{Deserialize, Serialize};

/// Closed intent taxonomy. Wire names match the graph query templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    QuerySymptom,
    QueryCureWay,
    QueryCause,
    QueryEasyGet,
    QueryCureLasttime,
    QueryCuredProb,
    QueryDesc,
    QueryPrevent,
    QueryRecommandDrug,
    QueryCommonDrug,
    QueryNoEat,
    QueryDoEat,
    QueryRecommandEat,
    QueryNeedCheck,
    QueryBelongsToDepartment,
    QuerySymptomDisease,
    QueryDrugProducer,
    QueryAcompanyDisease,
    QueryDrugSideEffect,
    QueryDrugEffectDisease,
    QueryCheckDiagnoseDisease,
    QueryDepartmentSubdepartment,
    Greeting,
    UnknownIntent,
}

impl IntentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::QuerySymptom                 => "query_symptom",
            IntentLabel::QueryCureWay                 => "query_cure_way",
            IntentLabel::QueryCause                   => "query_cause",
            IntentLabel::QueryEasyGet                 => "query_easy_get",
            IntentLabel::QueryCureLasttime            => "query_cure_lasttime",
            IntentLabel::QueryCuredProb               => "query_cured_prob",
            IntentLabel::QueryDesc                    => "query_desc",
            IntentLabel::QueryPrevent                 => "query_prevent",
            IntentLabel::QueryRecommandDrug           => "query_recommand_drug",
            IntentLabel::QueryCommonDrug              => "query_common_drug",
            IntentLabel::QueryNoEat                   => "query_no_eat",
            IntentLabel::QueryDoEat                   => "query_do_eat",
            IntentLabel::QueryRecommandEat            => "query_recommand_eat",
            IntentLabel::QueryNeedCheck               => "query_need_check",
            IntentLabel::QueryBelongsToDepartment     => "query_belongs_to_department",
            IntentLabel::QuerySymptomDisease          => "query_symptom_disease",
            IntentLabel::QueryDrugProducer            => "query_drug_producer",
            IntentLabel::QueryAcompanyDisease         => "query_acompany_disease",
            IntentLabel::QueryDrugSideEffect          => "query_drug_side_effect",
            IntentLabel::QueryDrugEffectDisease       => "query_drug_effect_disease",
            IntentLabel::QueryCheckDiagnoseDisease    => "query_check_diagnose_disease",
            IntentLabel::QueryDepartmentSubdepartment => "query_department_subdepartment",
            IntentLabel::Greeting                     => "greeting",
            IntentLabel::UnknownIntent                => "unknown_intent",
        }
    }

    pub fn is_greeting(&self) -> bool {
        matches!(self, IntentLabel::Greeting)
    }
}

impl std::fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
