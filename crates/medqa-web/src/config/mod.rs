//! Configuration loading for MedQA.
//! Reads medqa.toml from the current directory or the path in the MEDQA_CONFIG env var.
//! Every section is optional; missing keys fall back to the `default_*` values below.

use medqa_common::MedqaError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const CONFIG_ENV: &str = "MEDQA_CONFIG";
pub const NEO4J_PASSWORD_ENV: &str = "MEDQA_NEO4J_PASSWORD";
pub const LLM_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
pub const EMBEDDING_API_KEY_ENV: &str = "MEDQA_EMBEDDING_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ner: NerConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub rag: RagConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "0.0.0.0:5000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerConfig {
    /// JSONL export of graph entity names.
    #[serde(default = "default_entities_file")]
    pub entities_file: String,
    /// Use the built-in demo dictionary instead of `entities_file`.
    #[serde(default)]
    pub use_embedded: bool,
}

fn default_entities_file() -> String { "data/all_graph_entities.jsonl".to_string() }

impl Default for NerConfig {
    fn default() -> Self {
        Self { entities_file: default_entities_file(), use_embedded: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphBackend {
    Neo4j,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_graph_backend")]
    pub backend: GraphBackend,
    /// HTTP endpoint of the Neo4j server.
    #[serde(default = "default_neo4j_uri")]
    pub uri: String,
    #[serde(default = "default_neo4j_database")]
    pub database: String,
    #[serde(default = "default_neo4j_user")]
    pub user: String,
    /// Overridden by MEDQA_NEO4J_PASSWORD.
    pub password: Option<String>,
    /// Fixture for the `memory` backend.
    #[serde(default = "default_facts_file")]
    pub facts_file: String,
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

fn default_graph_backend()     -> GraphBackend { GraphBackend::Neo4j }
fn default_neo4j_uri()         -> String { "http://localhost:7474".to_string() }
fn default_neo4j_database()    -> String { "neo4j".to_string() }
fn default_neo4j_user()        -> String { "neo4j".to_string() }
fn default_facts_file()        -> String { "data/graph.json".to_string() }
fn default_lookup_timeout_ms() -> u64    { 2000 }

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            backend: default_graph_backend(),
            uri: default_neo4j_uri(),
            database: default_neo4j_database(),
            user: default_neo4j_user(),
            password: None,
            facts_file: default_facts_file(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_index_file")]
    pub index_file: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_embedding_base_url")]
    pub embedding_base_url: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_index_file()         -> String { "data/medical_facts.json".to_string() }
fn default_top_k()              -> usize  { 5 }
fn default_llm_base_url()       -> String { "https://api.deepseek.com/v1".to_string() }
fn default_llm_model()          -> String { "deepseek-chat".to_string() }
fn default_max_tokens()         -> u32    { 1024 }
fn default_temperature()        -> f32    { 0.7 }
fn default_embedding_base_url() -> String { "http://localhost:11434/v1".to_string() }
fn default_embedding_model()    -> String { "bge-m3".to_string() }

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            index_file: default_index_file(),
            top_k: default_top_k(),
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            embedding_base_url: default_embedding_base_url(),
            embedding_model: default_embedding_model(),
        }
    }
}

mod tests;

impl Config {
    /// Load configuration from medqa.toml.
    /// Checks MEDQA_CONFIG first, then the current directory. A missing file
    /// yields the built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "medqa.toml".to_string());

        if !Path::new(&path).exists() {
            info!("Config file {} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, MedqaError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), MedqaError> {
        if self.graph.lookup_timeout_ms == 0 {
            return Err(MedqaError::Config("graph.lookup_timeout_ms must be positive".into()));
        }
        if self.rag.enabled && self.rag.top_k == 0 {
            return Err(MedqaError::Config("rag.top_k must be positive".into()));
        }
        Ok(())
    }
}

impl GraphConfig {
    /// MEDQA_NEO4J_PASSWORD wins over the file value.
    pub fn resolved_password(&self) -> Option<String> {
        std::env::var(NEO4J_PASSWORD_ENV).ok().or_else(|| self.password.clone())
    }
}

impl RagConfig {
    pub fn llm_api_key(&self) -> Option<String> {
        std::env::var(LLM_API_KEY_ENV).ok()
    }

    pub fn embedding_api_key(&self) -> Option<String> {
        std::env::var(EMBEDDING_API_KEY_ENV).ok()
    }
}
