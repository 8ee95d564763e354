//! Transaction data structures for fraud risk scoring

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single transaction under evaluation. Immutable for the duration of
/// one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub transaction_id: String,

    /// Customer identifier used to look up history
    pub customer_id: String,

    /// Monetary amount
    pub amount: f64,

    /// Merchant name
    pub merchant: String,

    /// Categorical location label (e.g. "Mumbai"), if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Latitude, if the client reports coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude, if the client reports coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Device identifier
    pub device_id: String,

    /// Event timestamp; absent for clients that do not report one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Coordinate pair, present only when both latitude and longitude are set.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// One past transaction from the customer's history. Read-only input to
/// the signal evaluators; loaded from the history store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTransaction {
    pub customer_id: String,

    pub amount: f64,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    pub device_id: String,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl HistoricalTransaction {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_wire_names_are_camel_case() {
        let json = r#"{
            "transactionId": "tx_001",
            "customerId": "C1",
            "amount": 250.0,
            "merchant": "Acme",
            "location": "Mumbai",
            "deviceId": "D1",
            "timestamp": "2025-03-14T10:30:00Z"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.transaction_id, "tx_001");
        assert_eq!(tx.customer_id, "C1");
        assert_eq!(tx.device_id, "D1");
        assert_eq!(tx.location.as_deref(), Some("Mumbai"));
        assert!(tx.timestamp.is_some());
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let json = r#"{
            "transactionId": "tx_002",
            "customerId": "C1",
            "amount": 99.0,
            "merchant": "Acme",
            "deviceId": "D1"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert!(tx.location.is_none());
        assert!(tx.timestamp.is_none());
        assert!(tx.coordinates().is_none());
    }

    #[test]
    fn test_coordinates_require_both_axes() {
        let mut tx: Transaction = serde_json::from_str(
            r#"{"transactionId":"t","customerId":"c","amount":1.0,"merchant":"m","deviceId":"d"}"#,
        )
        .unwrap();

        tx.latitude = Some(19.07);
        assert!(tx.coordinates().is_none());

        tx.longitude = Some(72.87);
        assert_eq!(tx.coordinates(), Some((19.07, 72.87)));
    }
}
