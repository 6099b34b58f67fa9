//! GET /health: liveness plus component summary.

use std::time::Duration;

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use crate::state::SharedState;

const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub patterns: usize,
    pub graph_backend: &'static str,
    pub graph_reachable: bool,
    pub rag_enabled: bool,
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthReport> {
    let oracle = state.recommender.oracle();
    let graph_reachable = matches!(
        tokio::time::timeout(PING_TIMEOUT, oracle.ping()).await,
        Ok(Ok(()))
    );

    Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        patterns: state.extractor.automaton().len(),
        graph_backend: oracle.backend_name(),
        graph_reachable,
        rag_enabled: state.rag.is_some(),
    })
}
