//! Caller-facing result of query analysis.
//! Field names are camelCase on the wire to match the Q&A front end.

use serde::{Deserialize, Serialize};

use crate::entities::{Category, EntityMention};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: Category,
}

impl From<&EntityMention> for RelevantEntity {
    fn from(m: &EntityMention) -> Self {
        Self { id: m.kg_id(), name: m.text.clone(), entity_type: m.category }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedQuestion {
    pub question_text: String,
    pub question_id: String,
    pub relevant_entities: Vec<RelevantEntity>,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self { code: 200, message: "Success".to_string() }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Full output of one `/process_query` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnalysis {
    pub original_query: String,
    pub identified_keywords: Vec<String>,
    pub identified_intent: String,
    pub recommended_questions: Vec<RecommendedQuestion>,
    pub api_response: ApiResponse,
}
