//! Mutable evaluation state threaded through the scoring pipeline
//!
//! One `EvaluationState` is created per incoming transaction, lives for the
//! duration of a single evaluation, and is discarded after the report is
//! built. Each signal evaluator writes exactly one slot plus one node-list
//! entry; nothing is ever overwritten, reordered or removed.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::types::transaction::{HistoricalTransaction, Transaction};
use crate::types::verdict::{Action, Decision, Verdict};

/// The four fraud dimensions scored by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Behavioral,
    Geo,
    Device,
    Temporal,
}

impl Signal {
    /// Node-list identifier, e.g. `behavioral_agent`.
    pub fn id(self) -> &'static str {
        match self {
            Signal::Behavioral => "behavioral_agent",
            Signal::Geo => "geo_agent",
            Signal::Device => "device_agent",
            Signal::Temporal => "temporal_agent",
        }
    }

    /// Display name used in the node list.
    pub fn display_name(self) -> &'static str {
        match self {
            Signal::Behavioral => "Behavioral Agent",
            Signal::Geo => "Geo Agent",
            Signal::Device => "Device Agent",
            Signal::Temporal => "Temporal Agent",
        }
    }

    /// Short key used in explanations, e.g. `behavioral`.
    pub fn key(self) -> &'static str {
        match self {
            Signal::Behavioral => "behavioral",
            Signal::Geo => "geo",
            Signal::Device => "device",
            Signal::Temporal => "temporal",
        }
    }
}

/// Risk score in `[0,1]` and a short textual reason for one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub risk: f64,
    pub reason: String,
}

/// One entry in the audit/visualization trail. Evaluator entries carry
/// risk/reason; the decision entry carries decision/action/reasoning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// The shared evaluation record.
#[derive(Debug)]
pub struct EvaluationState {
    pub transaction: Transaction,
    pub history: Vec<HistoricalTransaction>,

    behavioral: Option<SignalResult>,
    geo: Option<SignalResult>,
    device: Option<SignalResult>,
    temporal: Option<SignalResult>,

    verdict: Option<Verdict>,

    /// Append-only audit trail, one entry per completed pipeline stage.
    pub nodes: Vec<PipelineNode>,

    /// Append-only free-text log of aggregator decisions and fallbacks.
    pub trace: Vec<String>,
}

impl EvaluationState {
    /// Build the state for one evaluation. Transaction and history are both
    /// fixed before any evaluator runs.
    pub fn new(transaction: Transaction, history: Vec<HistoricalTransaction>) -> Self {
        Self {
            transaction,
            history,
            behavioral: None,
            geo: None,
            device: None,
            temporal: None,
            verdict: None,
            nodes: Vec::new(),
            trace: Vec::new(),
        }
    }

    fn slot_mut(&mut self, signal: Signal) -> &mut Option<SignalResult> {
        match signal {
            Signal::Behavioral => &mut self.behavioral,
            Signal::Geo => &mut self.geo,
            Signal::Device => &mut self.device,
            Signal::Temporal => &mut self.temporal,
        }
    }

    /// Record an evaluator's result: sets the signal's slot and appends its
    /// node-list entry. Risk is rounded to two decimals for reporting.
    /// Writing a signal twice is an ordering bug.
    pub fn record_signal(&mut self, signal: Signal, risk: f64, reason: impl Into<String>) {
        let reason = reason.into();
        let risk = (risk * 100.0).round() / 100.0;

        let slot = self.slot_mut(signal);
        debug_assert!(slot.is_none(), "signal {:?} recorded twice", signal);
        *slot = Some(SignalResult {
            risk,
            reason: reason.clone(),
        });

        self.nodes.push(PipelineNode {
            id: signal.id().to_string(),
            name: signal.display_name().to_string(),
            risk: Some(risk),
            reason: Some(reason),
            decision: None,
            action: None,
            reasoning: None,
        });
    }

    /// Result for one signal, if its evaluator has run.
    pub fn signal(&self, signal: Signal) -> Option<&SignalResult> {
        match signal {
            Signal::Behavioral => self.behavioral.as_ref(),
            Signal::Geo => self.geo.as_ref(),
            Signal::Device => self.device.as_ref(),
            Signal::Temporal => self.temporal.as_ref(),
        }
    }

    /// Result for one signal, or an invariant-violation error if the
    /// evaluator has not run yet.
    pub fn require_signal(&self, signal: Signal) -> Result<&SignalResult, PipelineError> {
        self.signal(signal)
            .ok_or(PipelineError::MissingSignal(signal.key()))
    }

    /// Record the aggregator's verdict and its node-list entry.
    pub fn record_verdict(&mut self, verdict: Verdict) {
        self.nodes.push(PipelineNode {
            id: "llm_agent".to_string(),
            name: "LLM Decision Agent".to_string(),
            risk: None,
            reason: None,
            decision: Some(verdict.decision),
            action: Some(verdict.action),
            reasoning: Some(verdict.reasoning.clone()),
        });
        self.verdict = Some(verdict);
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn require_verdict(&self) -> Result<&Verdict, PipelineError> {
        self.verdict.as_ref().ok_or(PipelineError::MissingVerdict)
    }

    /// Append a free-text audit line.
    pub fn push_trace(&mut self, line: impl Into<String>) {
        self.trace.push(line.into());
    }
}
