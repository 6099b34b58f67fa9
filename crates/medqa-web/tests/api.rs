//! End-to-end tests of the HTTP surface against the demo dictionary and an
//! in-memory graph.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use futures_util::stream::{self, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use medqa_common::Category;
use medqa_kg::{InMemoryGraph, Recommender, Relation};
use medqa_ner::EntityExtractor;
use medqa_rag::chat::DeltaStream;
use medqa_rag::{ChatBackend, Embedder, FlatIndex, RagPipeline};
use medqa_web::router::build_router;
use medqa_web::state::AppState;

const GRAPH: &str = r#"{
    "nodes": [
        {"name": "高血压", "type": "Disease", "cure_way": "药物治疗", "prevent": "低盐饮食", "cause": "遗传"}
    ],
    "edges": [
        {"from": "高血压", "from_type": "Disease", "rel": "has_symptom", "to": "头晕", "to_type": "Symptom"},
        {"from": "高血压", "from_type": "Disease", "rel": "recommand_drug", "to": "降压药", "to_type": "Drug"},
        {"from": "高血压", "from_type": "Disease", "rel": "belongs_to", "to": "心内科", "to_type": "Department"}
    ]
}"#;

fn state(rag: Option<RagPipeline>) -> AppState {
    let extractor = EntityExtractor::with_embedded().unwrap();
    let mut graph = InMemoryGraph::from_json_str(GRAPH).unwrap();
    graph.relate(("华北制药", Category::Producer), Relation::Produces, ("阿莫西林", Category::Drug));
    let recommender = Recommender::new(Arc::new(graph), Duration::from_millis(500));
    AppState::new(extractor, recommender, rag)
}

fn app() -> Router {
    build_router(state(None))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn query(app: Router, text: &str) -> (StatusCode, Value) {
    let body = json!({ "queryText": text }).to_string();
    let (status, bytes) = send(app, post_json("/process_query", &body)).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn question_ids(v: &Value) -> Vec<String> {
    v["recommendedQuestions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["questionId"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_disease_query_end_to_end() {
    let (status, v) = query(app(), "高血压有什么症状").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["originalQuery"], "高血压有什么症状");
    assert_eq!(v["identifiedKeywords"], json!(["高血压"]));
    assert_eq!(v["identifiedIntent"], "query_symptom");
    assert_eq!(v["apiResponse"], json!({"code": 200, "message": "Success"}));
    assert_eq!(question_ids(&v), vec!["高血压_cure_way", "高血压_drugs", "高血压_department"]);

    let first = &v["recommendedQuestions"][0];
    assert_eq!(first["questionText"], "高血压有哪些治疗方法？");
    assert_eq!(
        first["relevantEntities"],
        json!([{"id": "kg_id_Disease_高血压", "name": "高血压", "type": "Disease"}])
    );
}

#[tokio::test]
async fn test_recommendations_are_bounded_and_sorted() {
    for text in ["高血压怎么预防", "头晕可能是什么病", "阿莫西林是哪个厂生产的", "今天天气不错"] {
        let (status, v) = query(app(), text).await;
        assert_eq!(status, StatusCode::OK);
        let scores: Vec<f64> = v["recommendedQuestions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["relevanceScore"].as_f64().unwrap())
            .collect();
        assert_eq!(scores.len(), 3, "{}", text);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{}", text);
    }
}

#[tokio::test]
async fn test_greeting_gets_no_recommendations() {
    let (_, v) = query(app(), "你好，我胃痛").await;
    assert_eq!(v["identifiedIntent"], "greeting");
    assert_eq!(v["identifiedKeywords"], json!(["胃痛"]));
    assert_eq!(v["recommendedQuestions"], json!([]));
}

#[tokio::test]
async fn test_no_entity_gets_general_questions() {
    let (_, v) = query(app(), "今天天气不错").await;
    assert_eq!(v["identifiedIntent"], "unknown_intent");
    assert_eq!(question_ids(&v), vec!["general_q_1", "general_q_2", "general_q_3"]);
}

#[tokio::test]
async fn test_producer_query_is_gated() {
    let (_, v) = query(app(), "华北制药的副作用是什么？").await;
    assert_eq!(v["identifiedIntent"], "unknown_intent");
    assert_eq!(v["identifiedKeywords"], json!(["华北制药"]));
    assert_eq!(question_ids(&v)[0], "general_entity_q");
}

#[tokio::test]
async fn test_missing_query_text_is_bad_request() {
    for body in [r#"{}"#, r#"{"queryText": ""}"#, r#"{"queryText": "   "}"#] {
        let (status, bytes) = send(app(), post_json("/process_query", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["apiResponse"]["code"], 400);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (status, bytes) = send(app(), post_json("/process_query", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["apiResponse"]["code"], 400);
}

async fn kg_answer(app: Router, question: &str) -> (StatusCode, Value) {
    let body = json!({ "selectedQuestion": question }).to_string();
    let (status, bytes) = send(app, post_json("/kg/answer", &body)).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_kg_answer_reads_disease_property() {
    let (status, v) = kg_answer(app(), "高血压怎么预防").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["identifiedIntent"], "query_prevent");
    assert_eq!(v["answer"], "高血压的预防方法是：低盐饮食。");
    assert_eq!(v["answerSource"], "answered");
    assert_eq!(v["relatedQuestions"].as_array().unwrap().len(), 3);
    assert_eq!(v["apiResponse"]["code"], 200);
}

#[tokio::test]
async fn test_kg_answer_lists_hop_targets() {
    let (_, v) = kg_answer(app(), "高血压有什么症状").await;
    assert_eq!(v["answer"], "高血压的常见症状有：头晕。");

    let (_, v) = kg_answer(app(), "阿莫西林是哪个厂生产的").await;
    assert_eq!(v["identifiedIntent"], "query_drug_producer");
    assert_eq!(v["answer"], "阿莫西林的生产厂家是：华北制药。");
}

#[tokio::test]
async fn test_kg_answer_not_found_and_greeting() {
    let (_, v) = kg_answer(app(), "高血压需要做哪些检查").await;
    assert_eq!(v["answerSource"], "not_found");
    assert_eq!(v["answer"], "抱歉，未能找到高血压的检查信息。");

    let (_, v) = kg_answer(app(), "你好").await;
    assert_eq!(v["answerSource"], "greeting");
    assert_eq!(v["relatedQuestions"], json!([]));
}

#[tokio::test]
async fn test_kg_answer_requires_question() {
    for body in [r#"{}"#, r#"{"selectedQuestion": " "}"#] {
        let (status, bytes) = send(app(), post_json("/kg/answer", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["apiResponse"]["code"], 400);
    }
}

#[tokio::test]
async fn test_health() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, bytes) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["status"], "ok");
    assert_eq!(v["graph_backend"], "memory");
    assert_eq!(v["graph_reachable"], true);
    assert_eq!(v["rag_enabled"], false);
    assert!(v["patterns"].as_u64().unwrap() > 50);
}

#[tokio::test]
async fn test_ask_without_rag_is_unavailable() {
    let (status, _) = send(app(), post_json("/ask", r#"{"question": "感冒怎么办？"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

struct UnitEmbedder;

#[async_trait]
impl Embedder for UnitEmbedder {
    async fn embed(&self, _text: &str) -> medqa_rag::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }
    fn model_id(&self) -> &str {
        "unit"
    }
}

struct EchoChat;

#[async_trait]
impl ChatBackend for EchoChat {
    async fn stream_chat(&self, _prompt: String) -> medqa_rag::Result<DeltaStream> {
        let deltas = vec![Ok("多休息，".to_string()), Ok("多喝水。".to_string())];
        Ok(stream::iter(deltas).boxed())
    }
    fn model_id(&self) -> &str {
        "echo"
    }
}

#[tokio::test]
async fn test_ask_streams_plain_text() {
    let mut index = FlatIndex::new(2);
    index.insert("感冒多由病毒引起。", vec![1.0, 0.0]).unwrap();
    let rag = RagPipeline::new(Arc::new(UnitEmbedder), Arc::new(index), Arc::new(EchoChat), 5);
    let app = build_router(state(Some(rag)));

    let resp = app.oneshot(post_json("/ask", r#"{"question": "感冒怎么办？"}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()["content-type"].to_str().unwrap().starts_with("text/plain"));
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), "多休息，多喝水。");
}

#[tokio::test]
async fn test_ask_requires_question() {
    let mut index = FlatIndex::new(2);
    index.insert("x", vec![1.0, 0.0]).unwrap();
    let rag = RagPipeline::new(Arc::new(UnitEmbedder), Arc::new(index), Arc::new(EchoChat), 5);
    let (status, _) = send(build_router(state(Some(rag))), post_json("/ask", r#"{"question": ""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
