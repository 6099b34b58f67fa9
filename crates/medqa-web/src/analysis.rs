//! Query analysis: extract, classify, then recommend or answer.

use medqa_common::{dominant_mention, ApiResponse, Category, QueryAnalysis, RecommendedQuestion};
use medqa_intent::classify;
use medqa_kg::AnswerOutcome;
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

/// Full analysis of one query. Entity extraction and intent classification
/// finish before any graph call is made.
pub async fn analyze(state: &AppState, query: &str) -> QueryAnalysis {
    let mentions = state.extractor.extract(query);
    let intent = classify(query, &mentions);
    let dominant = dominant_mention(&mentions, &Category::RECOMMENDATION_PREFERENCE);

    info!(
        query,
        entities = mentions.len(),
        %intent,
        dominant = dominant.map(|m| m.text.as_str()).unwrap_or("-"),
        "Query analyzed"
    );

    let recommended_questions = state.recommender.recommend(dominant, intent).await;

    QueryAnalysis {
        original_query: query.to_string(),
        identified_keywords: mentions.iter().map(|m| m.text.clone()).collect(),
        identified_intent: intent.as_str().to_string(),
        recommended_questions,
        api_response: ApiResponse::ok(),
    }
}

pub const DISCLAIMER: &str = "此回答仅供参考，不能替代专业医生的诊断。如有严重症状，请及时就医。";

/// Output of one `/kg/answer` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAnswerReport {
    pub answer: String,
    pub answer_source: AnswerOutcome,
    pub identified_keywords: Vec<String>,
    pub identified_intent: String,
    pub related_questions: Vec<RecommendedQuestion>,
    pub disclaimer: &'static str,
    pub api_response: ApiResponse,
}

/// Answer a question straight from the graph, with follow-ups alongside.
///
/// The answer is about the intent's main entity; follow-ups use the wider
/// recommendation preference. Both lookups run concurrently.
pub async fn answer_question(state: &AppState, question: &str) -> GraphAnswerReport {
    let mentions = state.extractor.extract(question);
    let intent = classify(question, &mentions);
    let main = dominant_mention(&mentions, &Category::INTENT_PREFERENCE);
    let dominant = dominant_mention(&mentions, &Category::RECOMMENDATION_PREFERENCE);

    let (answer, related_questions) = tokio::join!(
        state.answerer.answer(main, intent),
        state.recommender.recommend(dominant, intent),
    );
    info!(
        question,
        %intent,
        main = main.map(|m| m.text.as_str()).unwrap_or("-"),
        outcome = ?answer.outcome,
        "Graph answer produced"
    );

    GraphAnswerReport {
        answer: answer.text,
        answer_source: answer.outcome,
        identified_keywords: mentions.iter().map(|m| m.text.clone()).collect(),
        identified_intent: intent.as_str().to_string(),
        related_questions,
        disclaimer: DISCLAIMER,
        api_response: ApiResponse::ok(),
    }
}
