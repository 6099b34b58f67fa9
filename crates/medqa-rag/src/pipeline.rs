use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::chat::ChatBackend;
use crate::embedder::Embedder;
use crate::index::VectorIndex;
use crate::prompt::{build_prompt, NO_CONTEXT_APOLOGY};
use crate::Result;

#[derive(Clone)]
pub struct RagPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    chat: Arc<dyn ChatBackend>,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        chat: Arc<dyn ChatBackend>,
        top_k: usize,
    ) -> Self {
        Self { embedder, index, chat, top_k }
    }

    /// Nearest facts for `query`, most similar first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        let vector = self.embedder.embed(query).await?;
        let hits = self.index.search(&vector, self.top_k)?;
        Ok(hits.into_iter().map(|h| h.text).collect())
    }

    /// Answer `query` as a stream of text chunks.
    ///
    /// Never fails as a whole: retrieval or model errors are delivered as a
    /// final text chunk so the client always receives a complete body.
    pub fn answer_stream(&self, query: String) -> ReceiverStream<String> {
        let (tx, rx) = mpsc::channel(64);
        let this = self.clone();
        tokio::spawn(async move { this.drive(query, tx).await });
        ReceiverStream::new(rx)
    }

    async fn drive(&self, query: String, tx: mpsc::Sender<String>) {
        let facts = match self.retrieve(&query).await {
            Ok(f) => f,
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                let _ = tx.send(format!("检索知识库时发生错误: {}", e)).await;
                return;
            }
        };
        info!(facts = facts.len(), model = self.chat.model_id(), "Answering question");

        if facts.is_empty() {
            let _ = tx.send(NO_CONTEXT_APOLOGY.to_string()).await;
            return;
        }

        let mut deltas = match self.chat.stream_chat(build_prompt(&query, &facts)).await {
            Ok(s) => s,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                let _ = tx.send(llm_error_line(&e)).await;
                return;
            }
        };

        while let Some(delta) = deltas.next().await {
            let chunk = match delta {
                Ok(text) => text,
                Err(e) => {
                    warn!("Chat stream failed: {}", e);
                    let _ = tx.send(llm_error_line(&e)).await;
                    return;
                }
            };
            if tx.send(chunk).await.is_err() {
                // Client disconnected.
                return;
            }
        }
    }
}

fn llm_error_line(e: &crate::RagError) -> String {
    format!("调用LLM API时发生错误: {}", e)
}
