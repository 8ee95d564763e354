//! Device signal: device identifier versus the customer's known devices

use tracing::debug;

use crate::state::{EvaluationState, Signal};

pub fn evaluate(state: &mut EvaluationState) {
    let (risk, reason) = if state.history.is_empty() {
        (0.4, "No device history available")
    } else {
        let known = state
            .history
            .iter()
            .any(|h| h.device_id == state.transaction.device_id);

        if known {
            (0.1, "Transaction from known device")
        } else {
            (0.6, "Transaction from new device for this customer")
        }
    };

    debug!(
        transaction_id = %state.transaction.transaction_id,
        device_id = %state.transaction.device_id,
        risk,
        "Device signal evaluated"
    );
    state.record_signal(Signal::Device, risk, reason);
}
