//! POST /kg/answer: templated answer looked up in the knowledge graph.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use medqa_common::MedqaError;
use serde::Deserialize;

use crate::analysis::{answer_question, GraphAnswerReport};
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// Either a suggested follow-up the user picked or their own question.
    pub selected_question: Option<String>,
}

pub async fn kg_answer(
    State(state): State<SharedState>,
    body: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<GraphAnswerReport>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let question = req
        .selected_question
        .filter(|q| !q.trim().is_empty())
        .ok_or(MedqaError::MissingRequiredInput("selectedQuestion"))?;

    Ok(Json(answer_question(&state, &question).await))
}
