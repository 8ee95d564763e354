//! Customer transaction history store
//!
//! The history dataset is loaded once at startup from CSV and served as
//! read-only lookups by customer id. The store is behind a trait so tests
//! and alternative backends can substitute an in-memory map; lookups are
//! concurrent-safe because the data never mutates after load.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::transaction::HistoricalTransaction;

/// Read-only lookup of a customer's past transactions. May return an empty
/// vector for unknown customers; that is data, not an error.
pub trait HistoryStore: Send + Sync {
    fn history_for(&self, customer_id: &str) -> Vec<HistoricalTransaction>;
}

/// History store backed by a CSV file loaded fully into memory at startup.
///
/// Expected columns: `customerId,amount,location,latitude,longitude,deviceId,timestamp`,
/// with location/latitude/longitude/timestamp optional per row.
pub struct CsvHistoryStore {
    by_customer: HashMap<String, Vec<HistoricalTransaction>>,
}

impl CsvHistoryStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open history CSV at {}", path.display()))?;

        let mut by_customer: HashMap<String, Vec<HistoricalTransaction>> = HashMap::new();
        let mut total = 0usize;

        for record in reader.deserialize() {
            let entry: HistoricalTransaction =
                record.with_context(|| format!("Malformed row in {}", path.display()))?;
            by_customer
                .entry(entry.customer_id.clone())
                .or_default()
                .push(entry);
            total += 1;
        }

        info!(
            path = %path.display(),
            customers = by_customer.len(),
            transactions = total,
            "History store loaded"
        );

        Ok(Self { by_customer })
    }

    pub fn customer_count(&self) -> usize {
        self.by_customer.len()
    }
}

impl HistoryStore for CsvHistoryStore {
    fn history_for(&self, customer_id: &str) -> Vec<HistoricalTransaction> {
        self.by_customer
            .get(customer_id)
            .cloned()
            .unwrap_or_default()
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    by_customer: HashMap<String, Vec<HistoricalTransaction>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, customer_id: &str, history: Vec<HistoricalTransaction>) {
        self.by_customer.insert(customer_id.to_string(), history);
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn history_for(&self, customer_id: &str) -> Vec<HistoricalTransaction> {
        self.by_customer
            .get(customer_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
customerId,amount,location,latitude,longitude,deviceId,timestamp
C1,120.5,Mumbai,19.076,72.877,D1,2025-03-01T10:00:00Z
C1,80.0,Mumbai,19.076,72.877,D1,2025-03-02T11:00:00Z
C2,999.0,Delhi,28.613,77.209,D7,2025-03-03T02:00:00Z
";

    fn write_sample_csv() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_groups_rows_by_customer() {
        let file = write_sample_csv();
        let store = CsvHistoryStore::load(file.path()).unwrap();

        assert_eq!(store.customer_count(), 2);
        assert_eq!(store.history_for("C1").len(), 2);
        assert_eq!(store.history_for("C2").len(), 1);
    }

    #[test]
    fn test_unknown_customer_has_empty_history() {
        let file = write_sample_csv();
        let store = CsvHistoryStore::load(file.path()).unwrap();
        assert!(store.history_for("C999").is_empty());
    }

    #[test]
    fn test_row_fields_survive_load() {
        let file = write_sample_csv();
        let store = CsvHistoryStore::load(file.path()).unwrap();

        let history = store.history_for("C2");
        assert_eq!(history[0].amount, 999.0);
        assert_eq!(history[0].device_id, "D7");
        assert_eq!(history[0].location.as_deref(), Some("Delhi"));
        assert_eq!(history[0].coordinates(), Some((28.613, 77.209)));
        assert!(history[0].timestamp.is_some());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(CsvHistoryStore::load("/nonexistent/history.csv").is_err());
    }

    #[test]
    fn test_in_memory_store_round_trip() {
        let mut store = InMemoryHistoryStore::new();
        store.insert(
            "C1",
            vec![HistoricalTransaction {
                customer_id: "C1".to_string(),
                amount: 42.0,
                location: None,
                latitude: None,
                longitude: None,
                device_id: "D1".to_string(),
                timestamp: None,
            }],
        );

        assert_eq!(store.history_for("C1").len(), 1);
        assert!(store.history_for("C2").is_empty());
    }
}
