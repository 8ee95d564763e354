//! Decision aggregation: reasoning service first, weighted rule on failure
//!
//! The aggregator runs strictly after all signal evaluators. It attempts a
//! single reasoning-service call; any failure (timeout, transport error,
//! missing or malformed JSON, schema violation) triggers the deterministic
//! fallback rule and an audit line in the trace. Reasoning-service failures
//! are never propagated to the caller.

use tracing::{debug, warn};

use crate::decision::reasoning::{DecisionSignals, ReasoningService};
use crate::error::{PipelineError, ReasoningError};
use crate::state::{EvaluationState, Signal};
use crate::types::verdict::{Action, Decision, Verdict};

/// Fallback weights over behavioral/geo/device. Temporal risk is
/// intentionally excluded from the weighting; this asymmetry is preserved
/// from the production policy.
const FALLBACK_BEHAVIORAL_WEIGHT: f64 = 0.5;
const FALLBACK_GEO_WEIGHT: f64 = 0.3;
const FALLBACK_DEVICE_WEIGHT: f64 = 0.2;

pub struct DecisionAggregator {
    service: Option<Box<dyn ReasoningService>>,
}

impl DecisionAggregator {
    pub fn new(service: Option<Box<dyn ReasoningService>>) -> Self {
        Self { service }
    }

    /// Decide for the given state. Requires behavioral, geo and device
    /// signals to have run; anything else is an ordering defect.
    pub async fn decide(&self, state: &mut EvaluationState) -> Result<(), PipelineError> {
        state.push_trace("LLM Decision Agent started");

        let signals = DecisionSignals {
            behavioral: state.require_signal(Signal::Behavioral)?.clone(),
            geo: state.require_signal(Signal::Geo)?.clone(),
            device: state.require_signal(Signal::Device)?.clone(),
            temporal: state.signal(Signal::Temporal).cloned(),
        };

        let proposed = match &self.service {
            Some(service) => service.propose(&signals).await,
            None => Err(ReasoningError::Disabled),
        };

        let verdict = match proposed {
            Ok(verdict) => {
                debug!(
                    transaction_id = %state.transaction.transaction_id,
                    decision = %verdict.decision,
                    "Reasoning service returned a verdict"
                );
                verdict
            }
            Err(cause) => {
                warn!(
                    transaction_id = %state.transaction.transaction_id,
                    error = %cause,
                    "Reasoning service failed, applying fallback rule"
                );
                state.push_trace(format!("LLM failed, fallback used: {cause}"));
                fallback_verdict(&signals)
            }
        };

        state.push_trace(format!(
            "Decision={}, Action={}",
            verdict.decision, verdict.action
        ));
        state.record_verdict(verdict);
        Ok(())
    }
}

/// Deterministic weighted rule. Pure: fixed scores in, fixed verdict out,
/// independent of temporal risk.
pub fn fallback_verdict(signals: &DecisionSignals) -> Verdict {
    let combined = FALLBACK_BEHAVIORAL_WEIGHT * signals.behavioral.risk
        + FALLBACK_GEO_WEIGHT * signals.geo.risk
        + FALLBACK_DEVICE_WEIGHT * signals.device.risk;

    let (decision, action) = if combined > 0.65 {
        (Decision::MidRisk, Action::Review)
    } else if combined > 0.35 {
        (Decision::LowRisk, Action::Allow)
    } else {
        (Decision::VeryLowRisk, Action::Allow)
    };

    Verdict {
        decision,
        action,
        reasoning: "fallback weighted rule".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_support::{state_with_history, transaction};
    use crate::state::SignalResult;
    use async_trait::async_trait;

    fn signals(behavioral: f64, geo: f64, device: f64) -> DecisionSignals {
        let result = |risk: f64| SignalResult {
            risk,
            reason: "test".to_string(),
        };
        DecisionSignals {
            behavioral: result(behavioral),
            geo: result(geo),
            device: result(device),
            temporal: None,
        }
    }

    struct FixedReasoner(Result<Verdict, &'static str>);

    #[async_trait]
    impl ReasoningService for FixedReasoner {
        async fn propose(&self, _: &DecisionSignals) -> Result<Verdict, ReasoningError> {
            self.0
                .clone()
                .map_err(|m| ReasoningError::MalformedResponse(m.to_string()))
        }
    }

    fn scored_state(behavioral: f64, geo: f64, device: f64) -> EvaluationState {
        let mut state = state_with_history(transaction(100.0), vec![]);
        state.record_signal(Signal::Behavioral, behavioral, "b");
        state.record_signal(Signal::Geo, geo, "g");
        state.record_signal(Signal::Device, device, "d");
        state
    }

    #[test]
    fn test_fallback_high_combined_is_review() {
        // 0.5*0.9 + 0.3*0.9 + 0.2*0.6 = 0.84
        let verdict = fallback_verdict(&signals(0.9, 0.9, 0.6));
        assert_eq!(verdict.decision, Decision::MidRisk);
        assert_eq!(verdict.action, Action::Review);
        assert_eq!(verdict.reasoning, "fallback weighted rule");
    }

    #[test]
    fn test_fallback_mid_combined_is_allow() {
        // 0.5*0.4 + 0.3*0.4 + 0.2*0.4 = 0.4
        let verdict = fallback_verdict(&signals(0.4, 0.4, 0.4));
        assert_eq!(verdict.decision, Decision::LowRisk);
        assert_eq!(verdict.action, Action::Allow);
    }

    #[test]
    fn test_fallback_low_combined_is_very_low_risk() {
        // 0.5*0.1 + 0.3*0.1 + 0.2*0.1 = 0.1
        let verdict = fallback_verdict(&signals(0.1, 0.1, 0.1));
        assert_eq!(verdict.decision, Decision::VeryLowRisk);
        assert_eq!(verdict.action, Action::Allow);
    }

    #[test]
    fn test_fallback_boundary_065_is_low_risk() {
        // Exactly 0.65 is not above the threshold.
        let verdict = fallback_verdict(&signals(1.0, 0.5, 0.0));
        assert_eq!(verdict.decision, Decision::LowRisk);
    }

    #[test]
    fn test_fallback_ignores_temporal() {
        let mut with_temporal = signals(0.4, 0.4, 0.4);
        with_temporal.temporal = Some(SignalResult {
            risk: 0.95,
            reason: "worst case".to_string(),
        });

        assert_eq!(
            fallback_verdict(&with_temporal),
            fallback_verdict(&signals(0.4, 0.4, 0.4))
        );
    }

    #[tokio::test]
    async fn test_service_verdict_is_used_when_well_formed() {
        let aggregator = DecisionAggregator::new(Some(Box::new(FixedReasoner(Ok(Verdict {
            decision: Decision::HighRisk,
            action: Action::Block,
            reasoning: "all signals elevated".to_string(),
        })))));

        let mut state = scored_state(0.8, 0.9, 0.6);
        aggregator.decide(&mut state).await.unwrap();

        let verdict = state.verdict().unwrap();
        assert_eq!(verdict.decision, Decision::HighRisk);
        assert_eq!(verdict.action, Action::Block);

        // No fallback line, but the decision is always traced.
        assert!(state.trace.iter().all(|l| !l.contains("fallback")));
        assert!(state
            .trace
            .iter()
            .any(|l| l.contains("Decision=HIGH_RISK, Action=BLOCK")));
    }

    #[tokio::test]
    async fn test_service_failure_triggers_fallback_and_trace() {
        let aggregator =
            DecisionAggregator::new(Some(Box::new(FixedReasoner(Err("not json")))));

        let mut state = scored_state(0.4, 0.4, 0.4);
        aggregator.decide(&mut state).await.unwrap();

        let verdict = state.verdict().unwrap();
        assert_eq!(verdict.decision, Decision::LowRisk);
        assert_eq!(verdict.reasoning, "fallback weighted rule");
        assert!(state
            .trace
            .iter()
            .any(|l| l.contains("LLM failed, fallback used")));
    }

    #[tokio::test]
    async fn test_disabled_service_uses_fallback() {
        let aggregator = DecisionAggregator::new(None);

        let mut state = scored_state(0.1, 0.1, 0.1);
        aggregator.decide(&mut state).await.unwrap();

        assert_eq!(state.verdict().unwrap().decision, Decision::VeryLowRisk);
        assert!(state.trace.iter().any(|l| l.contains("disabled")));
    }

    #[tokio::test]
    async fn test_decide_before_signals_is_invariant_violation() {
        let aggregator = DecisionAggregator::new(None);
        let mut state = state_with_history(transaction(100.0), vec![]);

        let err = aggregator.decide(&mut state).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingSignal("behavioral")));
    }

    #[tokio::test]
    async fn test_aggregator_appends_llm_node() {
        let aggregator = DecisionAggregator::new(None);
        let mut state = scored_state(0.4, 0.4, 0.4);
        aggregator.decide(&mut state).await.unwrap();

        let node = state.nodes.last().unwrap();
        assert_eq!(node.id, "llm_agent");
        assert_eq!(node.name, "LLM Decision Agent");
        assert!(node.reasoning.is_some());
    }
}
