//! Streaming chat completion backends.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::sse::{SseDecoder, SseEvent};
use crate::{RagError, Result};

/// Stream of answer text deltas. An `Err` item ends the stream.
pub type DeltaStream = BoxStream<'static, Result<String>>;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a single user message and stream the reply.
    async fn stream_chat(&self, prompt: String) -> Result<DeltaStream>;
    fn model_id(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Any OpenAI-compatible `/chat/completions` endpoint (DeepSeek by default).
pub struct OpenAiCompatibleChat {
    settings: ChatSettings,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatibleChat {
    pub fn new(settings: ChatSettings, api_key: Option<String>) -> Self {
        Self { settings, api_key, client: reqwest::Client::new() }
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model":       &self.settings.model,
            "messages":    [{ "role": "user", "content": prompt }],
            "max_tokens":  self.settings.max_tokens,
            "temperature": self.settings.temperature,
            "stream":      true,
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatibleChat {
    async fn stream_chat(&self, prompt: String) -> Result<DeltaStream> {
        let url = format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'));
        let mut req = self.client.post(&url).json(&self.request_body(&prompt));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;

        let status = resp.status().as_u16();
        if status >= 400 {
            let message = resp.text().await.unwrap_or_else(|_| "unknown API error".to_string());
            return Err(RagError::Api { status, message });
        }

        let (tx, rx) = mpsc::channel::<Result<String>>(64);
        let mut bytes = Box::pin(resp.bytes_stream());
        tokio::spawn(async move {
            let mut decoder = SseDecoder::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("Chat stream interrupted: {}", e);
                        let _ = tx.send(Err(RagError::Http(e))).await;
                        return;
                    }
                };
                for event in decoder.push(&chunk) {
                    let item = match event {
                        SseEvent::Delta(text) => Ok(text),
                        SseEvent::Error(message) => Err(RagError::Api { status: 200, message }),
                        SseEvent::Done => return,
                    };
                    let is_err = item.is_err();
                    if tx.send(item).await.is_err() || is_err {
                        // Receiver gone or stream failed.
                        return;
                    }
                }
            }
            debug!("Chat stream closed without [DONE]");
        });

        Ok(ReceiverStream::new(rx).boxed())
    }

    fn model_id(&self) -> &str {
        &self.settings.model
    }
}
