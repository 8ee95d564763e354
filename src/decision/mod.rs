//! Final decision step: reasoning service, response recovery, fallback rule

pub mod aggregator;
pub mod extract;
pub mod reasoning;

pub use aggregator::{fallback_verdict, DecisionAggregator};
pub use reasoning::{DecisionSignals, OllamaReasoner, ReasoningService};
