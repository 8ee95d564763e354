//! Temporal signal: time-of-day risk against the customer's timing patterns
//!
//! Risk is a fixed base per hour band plus two adjustments: one for how the
//! hour compares to the customer's modal/mean hours, one for how often the
//! customer has transacted at this hour. The sum is capped at 0.95.

use chrono::Timelike;
use tracing::debug;

use crate::primitives::{stats, HourBand};
use crate::state::{EvaluationState, Signal};

/// Hard ceiling on temporal risk regardless of how adjustments sum.
const TEMPORAL_RISK_CAP: f64 = 0.95;

pub fn evaluate(state: &mut EvaluationState) {
    let (risk, reason) = match state.transaction.timestamp {
        None => (0.3, "No timestamp provided".to_string()),
        Some(ts) => score_hour(state, ts.hour()),
    };

    debug!(
        transaction_id = %state.transaction.transaction_id,
        risk,
        "Temporal signal evaluated"
    );
    state.record_signal(Signal::Temporal, risk, reason);
}

fn score_hour(state: &EvaluationState, hour: u32) -> (f64, String) {
    let band = HourBand::classify(hour);
    let base = band.base_risk();

    let historical_hours: Vec<u32> = state
        .history
        .iter()
        .filter_map(|h| h.timestamp)
        .map(|ts| ts.hour())
        .collect();

    if historical_hours.is_empty() {
        let reason = if state.history.is_empty() {
            format!("Transaction at {}. No customer history available.", band.label())
        } else {
            format!(
                "Transaction at {}. Limited historical data to compare patterns.",
                band.label()
            )
        };
        return (base, reason);
    }

    let modal_hours = stats::modes(&historical_hours);
    let mean_hour =
        historical_hours.iter().map(|&h| h as f64).sum::<f64>() / historical_hours.len() as f64;

    let (pattern_adjustment, pattern_reason) = if modal_hours.contains(&hour) {
        (
            0.0,
            format!("matches customer's typical hours {modal_hours:?}"),
        )
    } else if (hour as f64 - mean_hour).abs() > 8.0 {
        (
            0.3,
            format!("significantly differs from customer avg hour {mean_hour:.1}"),
        )
    } else {
        (
            0.1,
            format!("slightly differs from customer avg hour {mean_hour:.1}"),
        )
    };

    let freq_at_hour = stats::frequency_ratio(&historical_hours, &hour);
    let (frequency_adjustment, freq_reason) = if freq_at_hour == 0.0 {
        (0.2, "customer has never transacted at this hour".to_string())
    } else {
        let adjustment = if freq_at_hour > 0.1 { 0.0 } else { 0.1 };
        (
            adjustment,
            format!(
                "customer transacts {:.1}% of the time at this hour",
                freq_at_hour * 100.0
            ),
        )
    };

    let risk = (base + pattern_adjustment + frequency_adjustment).min(TEMPORAL_RISK_CAP);
    let reason = format!(
        "Transaction at {}. {}. {}.",
        band.label(),
        pattern_reason,
        freq_reason
    );

    (risk, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_support::{
        history_entry_at_hour, state_with_history, transaction, transaction_at_hour,
    };

    #[test]
    fn test_missing_timestamp_defaults() {
        let mut state = state_with_history(transaction(100.0), vec![]);
        evaluate(&mut state);

        let result = state.signal(Signal::Temporal).unwrap();
        assert_eq!(result.risk, 0.3);
        assert_eq!(result.reason, "No timestamp provided");
    }

    #[test]
    fn test_empty_history_uses_base_band_risk_only() {
        let mut state = state_with_history(transaction_at_hour(2), vec![]);
        evaluate(&mut state);

        let result = state.signal(Signal::Temporal).unwrap();
        assert_eq!(result.risk, 0.8);
        assert!(result.reason.contains("very late night"));
        assert!(result.reason.contains("No customer history available"));
    }

    #[test]
    fn test_modal_hour_gets_no_pattern_adjustment() {
        // Customer always transacts at 10:00; transaction at 10:00 in
        // business hours: base 0.1 + pattern 0.0 + frequency 0.0 (100% > 10%).
        let history = vec![
            history_entry_at_hour(10),
            history_entry_at_hour(10),
            history_entry_at_hour(10),
        ];
        let mut state = state_with_history(transaction_at_hour(10), history);
        evaluate(&mut state);

        let result = state.signal(Signal::Temporal).unwrap();
        assert_eq!(result.risk, 0.1);
        assert!(result.reason.contains("typical hours"));
    }

    #[test]
    fn test_worst_case_is_capped_at_095() {
        // 02:00 transaction, customer only ever transacts at 14:00:
        // base 0.8 + pattern 0.3 (|2-14| > 8) + frequency 0.2 (never at 02)
        // = 1.3, capped to 0.95.
        let history = vec![
            history_entry_at_hour(14),
            history_entry_at_hour(14),
            history_entry_at_hour(14),
        ];
        let mut state = state_with_history(transaction_at_hour(2), history);
        evaluate(&mut state);

        let result = state.signal(Signal::Temporal).unwrap();
        assert_eq!(result.risk, 0.95);
        assert!(result.reason.contains("never transacted at this hour"));
    }

    #[test]
    fn test_rare_but_seen_hour_gets_small_adjustments() {
        // One of twelve transactions at hour 11 (8.3% <= 10%): frequency 0.1.
        // Modal hour is 14, |11 - mean| <= 8: pattern 0.1. Base 0.1.
        let mut history: Vec<_> = (0..11).map(|_| history_entry_at_hour(14)).collect();
        history.push(history_entry_at_hour(11));

        let mut state = state_with_history(transaction_at_hour(11), history);
        evaluate(&mut state);

        let result = state.signal(Signal::Temporal).unwrap();
        assert_eq!(result.risk, 0.3);
        assert!(result.reason.contains("% of the time at this hour"));
    }

    #[test]
    fn test_reason_narrates_three_clauses() {
        let history = vec![history_entry_at_hour(14), history_entry_at_hour(9)];
        let mut state = state_with_history(transaction_at_hour(22), history);
        evaluate(&mut state);

        let reason = &state.signal(Signal::Temporal).unwrap().reason;
        assert!(reason.contains("night hours (21:00-23:59)"));
        assert!(reason.contains("avg hour"));
        assert!(reason.contains("never transacted"));
    }
}
