//! Shared data types for the scoring pipeline

pub mod transaction;
pub mod verdict;

pub use transaction::{HistoricalTransaction, Transaction};
pub use verdict::{Action, Decision, EvaluationReport, Explanation, Verdict};
