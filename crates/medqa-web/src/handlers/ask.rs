//! POST /ask: streamed RAG answer as plain text.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use futures_util::StreamExt;
use medqa_common::MedqaError;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
}

pub async fn ask(
    State(state): State<SharedState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let question = req
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or(MedqaError::MissingRequiredInput("question"))?;
    let rag = state.rag.as_ref().ok_or(ApiError::Disabled("RAG answering"))?;

    let chunks = rag.answer_stream(question).map(Ok::<_, Infallible>);
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(chunks),
    )
        .into_response())
}
