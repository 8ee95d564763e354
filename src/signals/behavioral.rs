//! Behavioral signal: transaction amount versus historical spending
//!
//! The three risk steps are deliberately coarse policy bands, not a smoothed
//! curve; amounts at or below the historical mean are low risk, up to 1.5x
//! the mean moderate, above that high.

use tracing::debug;

use crate::primitives::stats;
use crate::state::{EvaluationState, Signal};

pub fn evaluate(state: &mut EvaluationState) {
    let amount = state.transaction.amount;
    let amounts: Vec<f64> = state.history.iter().map(|h| h.amount).collect();

    let (risk, reason) = match stats::mean(&amounts) {
        None => (0.4, "No transaction history available".to_string()),
        Some(avg) => {
            if amount <= avg {
                (
                    0.1,
                    format!("Txn amount {amount:.2} is below or equal to usual avg {avg:.2}"),
                )
            } else if amount <= avg * 1.5 {
                (
                    0.4,
                    format!("Txn amount {amount:.2} is moderately higher than avg {avg:.2}"),
                )
            } else {
                (
                    0.8,
                    format!("Txn amount {amount:.2} is significantly higher than avg {avg:.2}"),
                )
            }
        }
    };

    debug!(
        transaction_id = %state.transaction.transaction_id,
        risk,
        "Behavioral signal evaluated"
    );
    state.record_signal(Signal::Behavioral, risk, reason);
}
