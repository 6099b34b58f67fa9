//! HTTP handlers for all routes.

pub mod answer;
pub mod ask;
pub mod query;
pub mod system;
