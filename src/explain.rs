//! Explanation builder
//!
//! Assembles the compliance/audit explanation from the verdict and each
//! signal's reason string, verbatim. A missing reason or verdict means the
//! pipeline ran out of order and is reported as an error, never papered
//! over with defaults.

use std::collections::BTreeMap;

use crate::error::PipelineError;
use crate::state::{EvaluationState, Signal};
use crate::types::verdict::Explanation;

/// Signals whose reasons are mandatory in every explanation.
const REQUIRED_SIGNALS: [Signal; 3] = [Signal::Behavioral, Signal::Geo, Signal::Device];

/// Build the explanation record. `include_temporal` mirrors the deployment's
/// temporal flag: when set, a missing temporal reason is an ordering defect
/// like any other missing signal.
pub fn build(state: &EvaluationState, include_temporal: bool) -> Result<Explanation, PipelineError> {
    let verdict = state.require_verdict()?;

    let mut signals = BTreeMap::new();
    for signal in REQUIRED_SIGNALS {
        let result = state.require_signal(signal)?;
        signals.insert(signal.key().to_string(), result.reason.clone());
    }
    if include_temporal {
        let result = state.require_signal(Signal::Temporal)?;
        signals.insert(Signal::Temporal.key().to_string(), result.reason.clone());
    }

    Ok(Explanation {
        decision: verdict.decision,
        action: verdict.action,
        llm_reasoning: verdict.reasoning.clone(),
        signals,
    })
}
