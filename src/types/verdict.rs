//! Final decision, explanation and report data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::PipelineNode;
use crate::types::transaction::Transaction;

/// Final risk classification for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "VERY_LOW_RISK")]
    VeryLowRisk,
    #[serde(rename = "LOW_RISK")]
    LowRisk,
    #[serde(rename = "MID_RISK")]
    MidRisk,
    #[serde(rename = "HIGH_RISK")]
    HighRisk,
}

/// Action the caller should take for the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Allow,
    Review,
    Block,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Decision::VeryLowRisk => "VERY_LOW_RISK",
            Decision::LowRisk => "LOW_RISK",
            Decision::MidRisk => "MID_RISK",
            Decision::HighRisk => "HIGH_RISK",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::Allow => "ALLOW",
            Action::Review => "REVIEW",
            Action::Block => "BLOCK",
        };
        f.write_str(s)
    }
}

/// Decision produced by the aggregator, either by the reasoning service
/// or by the deterministic fallback rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    pub action: Action,
    pub reasoning: String,
}

/// Human-facing explanation record. Signal values are the evaluators'
/// reason strings verbatim, keyed by signal name; the map is ordered so
/// the serialized form is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub decision: Decision,
    pub action: Action,
    pub llm_reasoning: String,
    pub signals: BTreeMap<String, String>,
}

/// Full evaluation result returned to the caller: the echoed transaction,
/// the verdict, the explanation, and the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    /// Unique report identifier
    pub report_id: String,

    /// The transaction that was evaluated
    pub transaction: Transaction,

    pub decision: Decision,

    pub action: Action,

    pub explanation: Explanation,

    /// Ordered audit/visualization trail, one entry per pipeline stage
    pub nodes: Vec<PipelineNode>,

    /// Free-text log lines recording aggregator decisions and fallbacks
    pub trace: Vec<String>,
}
