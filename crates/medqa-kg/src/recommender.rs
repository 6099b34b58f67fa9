//! Follow-up question generation.
//!
//! All applicable facets are probed concurrently, each under its own
//! timeout. A failed or slow probe only costs its own question. The
//! surviving candidates are padded with generic filler, ranked by score and
//! cut to [`MAX_RECOMMENDATIONS`].

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use medqa_common::{Category, EntityMention, RecommendedQuestion, RelevantEntity};
use medqa_intent::IntentLabel;
use tracing::{debug, warn};

use crate::facets::{
    self, Facet, FacetProbe, GeneralQuestion, FILLER_DISEASE_ID, FILLER_DISEASE_TEMPLATE,
    FILLER_ENTITY_ID, FILLER_ENTITY_TEMPLATE, FILLER_FINAL, FILLER_MORE, GENERAL_QUESTIONS,
    SCORE_FILLER_ENTITY,
};
use crate::oracle::GraphOracle;
use crate::{KgError, Result};

pub const MAX_RECOMMENDATIONS: usize = 3;

/// Hard stop for the filler loop.
const FILLER_CAP: usize = 5;

pub struct Recommender {
    oracle: Arc<dyn GraphOracle>,
    lookup_timeout: Duration,
}

impl Recommender {
    pub fn new(oracle: Arc<dyn GraphOracle>, lookup_timeout: Duration) -> Self {
        Self { oracle, lookup_timeout }
    }

    pub fn oracle(&self) -> &Arc<dyn GraphOracle> {
        &self.oracle
    }

    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Exactly [`MAX_RECOMMENDATIONS`] questions, highest score first, for
    /// an entity-bearing query.
    ///
    /// A greeting gets no recommendations. A query with no dominant entity
    /// gets the generic starter questions only when its intent is unknown.
    /// Neither case consults the graph.
    pub async fn recommend(
        &self,
        dominant: Option<&EntityMention>,
        intent: IntentLabel,
    ) -> Vec<RecommendedQuestion> {
        let entity = match dominant {
            Some(e) if !intent.is_greeting() => e,
            _ if intent == IntentLabel::UnknownIntent => {
                return GENERAL_QUESTIONS.iter().map(general).collect()
            }
            _ => return Vec::new(),
        };

        let probes = facets::applicable(entity.category, intent)
            .map(|facet| self.probe(facet, entity));
        let mut questions: Vec<RecommendedQuestion> = join_all(probes)
            .await
            .into_iter()
            .flatten()
            .collect();
        debug!(
            entity = %entity.text,
            category = %entity.category,
            %intent,
            hits = questions.len(),
            "Graph facets probed"
        );

        pad_with_filler(&mut questions, entity);

        // Stable: equal scores keep facet order.
        questions.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        questions.truncate(MAX_RECOMMENDATIONS);
        questions
    }

    /// Run one facet probe; any failure is logged and yields no question.
    async fn probe(&self, facet: &Facet, entity: &EntityMention) -> Option<RecommendedQuestion> {
        match tokio::time::timeout(self.lookup_timeout, self.hit(facet, entity)).await {
            Ok(Ok(true)) => Some(facet_question(facet, entity)),
            Ok(Ok(false)) => None,
            Ok(Err(e)) => {
                warn!(entity = %entity.text, facet = facet.id_suffix, "Graph lookup failed: {}", e);
                None
            }
            Err(_) => {
                let err = KgError::Timeout(self.lookup_timeout.as_millis() as u64);
                warn!(entity = %entity.text, facet = facet.id_suffix, "{}", err);
                None
            }
        }
    }

    async fn hit(&self, facet: &Facet, entity: &EntityMention) -> Result<bool> {
        match facet.probe {
            FacetProbe::Always => Ok(true),
            FacetProbe::Hop(ref probe) => self.oracle.hop_exists(&entity.text, probe).await,
            FacetProbe::Property(property) => Ok(self
                .oracle
                .node_property(&entity.text, entity.category, property)
                .await?
                .is_some()),
        }
    }
}

fn facet_question(facet: &Facet, entity: &EntityMention) -> RecommendedQuestion {
    RecommendedQuestion {
        question_text: facet.question_text(&entity.text),
        question_id: facet.question_id(&entity.text),
        relevant_entities: vec![RelevantEntity::from(entity)],
        relevance_score: facet.score,
    }
}

fn general(q: &GeneralQuestion) -> RecommendedQuestion {
    RecommendedQuestion {
        question_text: q.text.to_string(),
        question_id: q.id.to_string(),
        relevant_entities: Vec::new(),
        relevance_score: q.score,
    }
}

fn entity_filler(template: &str, id: &str, entity: &EntityMention) -> RecommendedQuestion {
    RecommendedQuestion {
        question_text: template.replace("{name}", &entity.text),
        question_id: id.to_string(),
        relevant_entities: vec![RelevantEntity::from(entity)],
        relevance_score: SCORE_FILLER_ENTITY,
    }
}

fn pad_with_filler(questions: &mut Vec<RecommendedQuestion>, entity: &EntityMention) {
    while questions.len() < MAX_RECOMMENDATIONS {
        let filler = match (entity.category, questions.is_empty()) {
            (Category::Disease, true) => entity_filler(FILLER_DISEASE_TEMPLATE, FILLER_DISEASE_ID, entity),
            (Category::Disease, false) => general(&FILLER_MORE),
            (_, true) => entity_filler(FILLER_ENTITY_TEMPLATE, FILLER_ENTITY_ID, entity),
            (_, false) => general(&FILLER_FINAL),
        };
        questions.push(filler);
        if questions.len() > FILLER_CAP {
            break;
        }
    }
}
