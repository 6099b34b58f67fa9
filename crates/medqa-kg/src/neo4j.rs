//! Neo4j backend over the HTTP transactional endpoint.
//!
//! Every probe is a single auto-committed statement:
//! `POST {uri}/db/{database}/tx/commit` with basic auth.

use std::time::Duration;

use async_trait::async_trait;
use medqa_common::Category;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::oracle::GraphOracle;
use crate::relation::{HopProbe, NodeProperty};
use crate::{KgError, Result};

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

pub struct Neo4jClient {
    commit_url: String,
    user: String,
    password: Option<String>,
    client: reqwest::Client,
}

impl Neo4jClient {
    pub fn new(
        uri: &str,
        database: &str,
        user: impl Into<String>,
        password: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            commit_url: format!("{}/db/{}/tx/commit", uri.trim_end_matches('/'), database),
            user: user.into(),
            password,
            client,
        })
    }

    /// Run one statement and return the first column of the first row.
    async fn first_value(&self, statement: &str, name: &str) -> Result<Option<Value>> {
        let tx = self.run(statement, name).await?;
        Ok(first_column(tx)?.into_iter().next())
    }

    /// Run one auto-committed statement with `$name` bound.
    async fn run(&self, statement: &str, name: &str) -> Result<TxResponse> {
        debug!(statement, name, "Neo4j query");
        let body = json!({
            "statements": [{
                "statement": statement,
                "parameters": { "name": name },
            }]
        });

        let resp = self
            .client
            .post(&self.commit_url)
            .basic_auth(&self.user, self.password.as_deref())
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status >= 400 {
            let message = resp.text().await.unwrap_or_default();
            return Err(KgError::Query { code: format!("HTTP {}", status), message });
        }

        Ok(resp.json().await?)
    }
}

/// First column of every row of the single statement result.
fn first_column(tx: TxResponse) -> Result<Vec<Value>> {
    if let Some(err) = tx.errors.into_iter().next() {
        return Err(KgError::Query { code: err.code, message: err.message });
    }
    let result = tx
        .results
        .into_iter()
        .next()
        .ok_or_else(|| KgError::UnexpectedResponse("no statement result".into()))?;
    Ok(result
        .data
        .into_iter()
        .filter_map(|r| r.row.into_iter().next())
        .collect())
}

/// Flatten a property value into display text; lists are joined.
pub(crate) fn property_text(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .filter_map(property_text)
            .collect::<Vec<_>>()
            .join("；"),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[async_trait]
impl GraphOracle for Neo4jClient {
    async fn hop_exists(&self, name: &str, probe: &HopProbe) -> Result<bool> {
        let value = self.first_value(&probe.cypher(), name).await?;
        Ok(value.is_some())
    }

    async fn hop_targets(&self, name: &str, probe: &HopProbe, limit: usize) -> Result<Vec<String>> {
        let tx = self.run(&probe.list_cypher(limit), name).await?;
        Ok(first_column(tx)?
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect())
    }

    async fn node_property(
        &self,
        name: &str,
        category: Category,
        property: NodeProperty,
    ) -> Result<Option<String>> {
        let value = self.first_value(&property.cypher(category), name).await?;
        Ok(value.and_then(property_text))
    }

    fn backend_name(&self) -> &'static str {
        "neo4j"
    }

    async fn ping(&self) -> Result<()> {
        self.first_value("RETURN $name", "ping").await.map(|_| ())
    }
}
