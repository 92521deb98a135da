//! Evaluation of chatbot responses.
//!
//! This module provides:
//! - Response generation (template stub or LLM travel assistant)
//! - LLM-as-judge scoring on relevance, correctness and helpfulness
//! - Query set loading and the evaluation runner

pub mod dataset;
pub mod responder;
pub mod runner;
pub mod scorer;

pub use dataset::{QuerySet, create_sample_queries};
pub use responder::{AnyResponder, LlmResponder, Responder, TemplateResponder};
pub use runner::{EvalConfig, EvalRecord, EvalReport, EvalRunner};
pub use scorer::{LlmScorer, ResponseScorer, Scores};
