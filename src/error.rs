//! Error taxonomy for the scoring pipeline.
//!
//! Missing input data (no history, no timestamp, no coordinates) is never an
//! error — evaluators handle it locally with documented default scores. The
//! variants here cover the two remaining classes: reasoning-service failures,
//! which are recoverable and feed the fallback rule, and pipeline invariant
//! violations, which indicate an ordering bug and are surfaced to the caller.

use thiserror::Error;

/// Failures of the external reasoning service. Every variant is recoverable:
/// the decision aggregator catches these and applies the fallback rule.
#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("reasoning service unreachable: {0}")]
    Unreachable(String),

    #[error("reasoning service timed out after {0} ms")]
    Timeout(u64),

    #[error("reasoning service returned no JSON object: {0}")]
    NoJsonFound(String),

    #[error("reasoning service returned malformed JSON: {0}")]
    MalformedResponse(String),

    #[error("reasoning service disabled by configuration")]
    Disabled,
}

/// Pipeline invariant violations. These are programming/ordering defects
/// (e.g. building an explanation before a required signal ran) and are
/// surfaced to the caller rather than recovered.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("signal '{0}' has not been evaluated")]
    MissingSignal(&'static str),

    #[error("no verdict recorded; decision aggregator has not run")]
    MissingVerdict,

    #[error("history store error: {0}")]
    HistoryStore(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_signal() {
        let err = PipelineError::MissingSignal("behavioral");
        assert!(err.to_string().contains("behavioral"));
    }

    #[test]
    fn test_timeout_message_carries_budget() {
        let err = ReasoningError::Timeout(2500);
        assert!(err.to_string().contains("2500"));
    }
}
