//! Rule-based intent classification for medical queries.
//!
//! A query is mapped to exactly one [`IntentLabel`] by walking a fixed,
//! priority-ordered keyword table, gated by the category of the dominant
//! entity mention.

pub mod classifier;
pub mod label;
pub mod rules;

pub use classifier::{classify, dominant_category};
pub use label::IntentLabel;
pub use rules::{Gate, IntentRule, RULES};
