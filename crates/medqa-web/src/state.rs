//! Shared application state for the web server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use medqa_kg::{GraphAnswerer, GraphOracle, InMemoryGraph, Neo4jClient, Recommender};
use medqa_ner::EntityExtractor;
use medqa_rag::{ChatSettings, FlatIndex, HttpEmbedder, OpenAiCompatibleChat, RagPipeline};
use tracing::info;

use crate::config::{Config, GraphBackend, GraphConfig, RagConfig};

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub extractor: EntityExtractor,
    pub recommender: Recommender,
    /// Shares the recommender's graph backend and timeout.
    pub answerer: GraphAnswerer,
    /// `None` when `/ask` is disabled.
    pub rag: Option<RagPipeline>,
}

impl AppState {
    pub fn new(extractor: EntityExtractor, recommender: Recommender, rag: Option<RagPipeline>) -> Self {
        let answerer = GraphAnswerer::new(recommender.oracle().clone(), recommender.lookup_timeout());
        Self { extractor, recommender, answerer, rag }
    }

    /// Build every component from configuration. Fails fast on a missing
    /// entity file or an empty dictionary.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let extractor = if config.ner.use_embedded {
            EntityExtractor::with_embedded()?
        } else {
            EntityExtractor::from_file(&config.ner.entities_file).with_context(|| {
                format!(
                    "Loading entity dictionary from {} (set ner.use_embedded = true for the demo dictionary)",
                    config.ner.entities_file
                )
            })?
        };

        let oracle = build_oracle(&config.graph)?;
        info!(backend = oracle.backend_name(), "Graph backend ready");
        let recommender =
            Recommender::new(oracle, Duration::from_millis(config.graph.lookup_timeout_ms));

        let rag = if config.rag.enabled {
            Some(build_rag(&config.rag)?)
        } else {
            info!("RAG answering disabled");
            None
        };

        Ok(Self::new(extractor, recommender, rag))
    }
}

fn build_oracle(graph: &GraphConfig) -> anyhow::Result<Arc<dyn GraphOracle>> {
    Ok(match graph.backend {
        GraphBackend::Neo4j => Arc::new(Neo4jClient::new(
            &graph.uri,
            &graph.database,
            graph.user.clone(),
            graph.resolved_password(),
            Duration::from_millis(graph.lookup_timeout_ms),
        )?),
        GraphBackend::Memory => Arc::new(
            InMemoryGraph::from_file(&graph.facts_file)
                .with_context(|| format!("Loading graph fixture {}", graph.facts_file))?,
        ),
    })
}

fn build_rag(rag: &RagConfig) -> anyhow::Result<RagPipeline> {
    let index = FlatIndex::from_file(&rag.index_file)
        .with_context(|| format!("Loading vector index {}", rag.index_file))?;
    let embedder = HttpEmbedder::new(&rag.embedding_base_url, &rag.embedding_model, rag.embedding_api_key());
    let chat = OpenAiCompatibleChat::new(
        ChatSettings {
            base_url: rag.base_url.clone(),
            model: rag.model.clone(),
            max_tokens: rag.max_tokens,
            temperature: rag.temperature,
        },
        rag.llm_api_key(),
    );
    info!(model = %rag.model, top_k = rag.top_k, "RAG answering enabled");
    Ok(RagPipeline::new(Arc::new(embedder), Arc::new(index), Arc::new(chat), rag.top_k))
}

pub type SharedState = Arc<AppState>;
