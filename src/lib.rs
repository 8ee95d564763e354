//! Fraud Signal Pipeline Library
//!
//! Scores a single transaction for fraud risk by combining four
//! independent, explainable rule-based signal evaluators with an
//! LLM-backed decision step that falls back to a deterministic
//! weighted rule when the reasoning service is unavailable.

pub mod config;
pub mod consumer;
pub mod decision;
pub mod error;
pub mod explain;
pub mod history;
pub mod metrics;
pub mod pipeline;
pub mod primitives;
pub mod producer;
pub mod signals;
pub mod state;
pub mod types;

pub use config::AppConfig;
pub use consumer::CheckRequestConsumer;
pub use decision::{DecisionAggregator, OllamaReasoner, ReasoningService};
pub use history::{CsvHistoryStore, HistoryStore};
pub use pipeline::FraudPipeline;
pub use producer::ReportProducer;
pub use state::EvaluationState;
pub use types::{EvaluationReport, Transaction};
