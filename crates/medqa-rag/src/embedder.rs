use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{RagError, Result};

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn model_id(&self) -> &str;
}

/// Any OpenAI-compatible `/embeddings` endpoint (Ollama, vLLM, TEI, …).
pub struct HttpEmbedder {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

fn parse_embedding(json: &Value) -> Result<Vec<f32>> {
    let values = json["data"][0]["embedding"]
        .as_array()
        .ok_or_else(|| RagError::MalformedResponse("missing data[0].embedding".into()))?;
    Ok(values
        .iter()
        .filter_map(|v| v.as_f64())
        .map(|v| v as f32)
        .collect())
}

/// Status is checked before the body is decoded, so a non-JSON error page
/// still surfaces as `RagError::Api`.
fn decode_response(status: u16, body: &str) -> Result<Vec<f32>> {
    if status >= 400 {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        return Err(RagError::Api { status, message });
    }
    let json: Value = serde_json::from_str(body)?;
    parse_embedding(&json)
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({ "model": &self.model, "input": [text] });

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        decode_response(status, &body)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_openai_embedding() {
        let json = json!({"data": [{"embedding": [0.5, -1.0, 0.25], "index": 0}], "model": "bge"});
        assert_eq!(parse_embedding(&json).unwrap(), vec![0.5, -1.0, 0.25]);
    }

    #[test]
    fn test_error_status_with_html_body_keeps_status() {
        let err = decode_response(503, "<html>Service Unavailable</html>\n").unwrap_err();
        match err {
            RagError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "<html>Service Unavailable</html>");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_status_with_json_body_uses_message() {
        let err = decode_response(401, r#"{"error": {"message": "invalid api key"}}"#).unwrap_err();
        assert!(matches!(err, RagError::Api { status: 401, ref message } if message == "invalid api key"));
    }

    #[test]
    fn test_success_body_is_decoded() {
        let body = r#"{"data": [{"embedding": [1.0, 2.0]}]}"#;
        assert_eq!(decode_response(200, body).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_parse_missing_embedding() {
        let err = parse_embedding(&json!({"data": []})).unwrap_err();
        assert!(matches!(err, RagError::MalformedResponse(_)));
    }
}
