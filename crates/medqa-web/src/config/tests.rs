#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:5000");
        assert_eq!(config.graph.backend, GraphBackend::Neo4j);
        assert_eq!(config.graph.lookup_timeout_ms, 2000);
        assert!(!config.rag.enabled);
        assert_eq!(config.rag.top_k, 5);
        assert_eq!(config.rag.model, "deepseek-chat");
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml_str(
            r#"
            [ner]
            use_embedded = true

            [graph]
            backend = "memory"
            facts_file = "fixtures/graph.json"
            "#,
        )
        .unwrap();
        assert!(config.ner.use_embedded);
        assert_eq!(config.ner.entities_file, default_entities_file());
        assert_eq!(config.graph.backend, GraphBackend::Memory);
        assert_eq!(config.graph.facts_file, "fixtures/graph.json");
        assert_eq!(config.graph.database, "neo4j");
    }

    #[test]
    fn test_llm_defaults() {
        let rag = RagConfig::default();
        assert_eq!(rag.base_url, "https://api.deepseek.com/v1");
        assert_eq!(rag.max_tokens, 1024);
        assert!((rag.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Config::from_toml_str("[graph]\nlookup_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, MedqaError::Config(_)));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = Config::from_toml_str("[graph]\nbackend = \"bolt\"\n").unwrap_err();
        assert!(matches!(err, MedqaError::Toml(_)));
    }
}
