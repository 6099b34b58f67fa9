//! POST /process_query: entity, intent and follow-up analysis.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use medqa_common::{MedqaError, QueryAnalysis};
use serde::Deserialize;

use crate::analysis::analyze;
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query_text: Option<String>,
    /// Accepted for front-end compatibility; not used.
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

pub async fn process_query(
    State(state): State<SharedState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryAnalysis>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let query = req
        .query_text
        .filter(|q| !q.trim().is_empty())
        .ok_or(MedqaError::MissingRequiredInput("queryText"))?;

    Ok(Json(analyze(&state, &query).await))
}
