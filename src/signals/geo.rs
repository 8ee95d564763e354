//! Geographic signal: transaction location versus historical locations
//!
//! Two mutually exclusive modes exist, selected per deployment through
//! configuration and never blended within one evaluation: coordinate mode
//! classifies the minimum great-circle distance to any historical point,
//! categorical mode compares the location label against the customer's
//! most frequent historical labels.

use serde::Deserialize;
use tracing::debug;

use crate::primitives::{haversine_km, stats};
use crate::state::{EvaluationState, Signal};

/// Deployment-wide geo scoring mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeoMode {
    /// Minimum haversine distance to historical coordinates
    Coordinate,
    /// Label match against the top-3 most frequent historical locations
    #[default]
    Categorical,
}

/// Number of usual locations compared against in categorical mode.
const USUAL_LOCATION_COUNT: usize = 3;

pub fn evaluate(state: &mut EvaluationState, mode: GeoMode) {
    let (risk, reason) = match mode {
        GeoMode::Coordinate => score_by_distance(state),
        GeoMode::Categorical => score_by_label(state),
    };

    debug!(
        transaction_id = %state.transaction.transaction_id,
        ?mode,
        risk,
        "Geo signal evaluated"
    );
    state.record_signal(Signal::Geo, risk, reason);
}

fn score_by_distance(state: &EvaluationState) -> (f64, String) {
    let point = match state.transaction.coordinates() {
        Some(p) => p,
        None => return (0.5, "Transaction location data missing.".to_string()),
    };

    if state.history.is_empty() {
        return (0.5, "No historical geo data available.".to_string());
    }

    let min_distance = state
        .history
        .iter()
        .filter_map(|h| h.coordinates())
        .map(|hp| haversine_km(point, hp))
        .fold(f64::INFINITY, f64::min);

    if min_distance.is_infinite() {
        return (0.5, "Insufficient historical geo coordinates.".to_string());
    }

    let (risk, reason) = distance_band(min_distance);
    (risk, reason.to_string())
}

/// Maps a minimum distance in kilometres to a risk band.
///
/// Bands are strict `<`: a distance exactly at a boundary falls into the
/// next (higher-risk) band.
fn distance_band(min_distance_km: f64) -> (f64, &'static str) {
    if min_distance_km < 5.0 {
        (0.1, "Transaction within normal geographic radius.")
    } else if min_distance_km < 50.0 {
        (0.4, "Transaction moderately distant from usual location.")
    } else if min_distance_km < 200.0 {
        (0.7, "Transaction far from historical location.")
    } else {
        (0.9, "Transaction extremely distant from historical pattern.")
    }
}

fn score_by_label(state: &EvaluationState) -> (f64, String) {
    let location = match &state.transaction.location {
        Some(l) => l,
        None => return (0.5, "Transaction location data missing.".to_string()),
    };

    let labels: Vec<String> = state
        .history
        .iter()
        .filter_map(|h| h.location.clone())
        .collect();

    if labels.is_empty() {
        return (0.5, "No historical geo data available.".to_string());
    }

    let usual = stats::top_frequent(&labels, USUAL_LOCATION_COUNT);

    if usual.contains(location) {
        (
            0.1,
            format!("Location {location} matches usual locations {usual:?}"),
        )
    } else {
        (
            0.6,
            format!("Location {location} not among usual locations {usual:?}"),
        )
    }
}
