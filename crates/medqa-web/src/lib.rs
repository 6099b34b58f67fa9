//! medqa-web: HTTP front end for the medical Q&A assistant.
//! Routes:
//!   - POST /process_query  entity, intent and follow-up question analysis
//!   - POST /kg/answer      answer looked up in the knowledge graph
//!   - POST /ask            streamed, retrieval-grounded answer
//!   - GET  /health         component summary

pub mod analysis;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
