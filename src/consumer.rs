//! NATS consumer for incoming fraud check requests
//!
//! Owns the request boundary: subscribing to the check subject and
//! decoding raw message payloads into [`Transaction`] values.

use anyhow::{Context, Result};
use async_nats::{Client, Subscriber};
use tracing::info;

use crate::types::Transaction;

/// Consumer for receiving fraud check requests from NATS
pub struct CheckRequestConsumer {
    client: Client,
    subject: String,
}

impl CheckRequestConsumer {
    /// Create a new request consumer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Subscribe to the request subject
    pub async fn subscribe(&self) -> Result<Subscriber> {
        let subscriber = self.client.subscribe(self.subject.clone()).await?;
        info!(subject = %self.subject, "Subscribed to fraud check subject");
        Ok(subscriber)
    }

    /// Decode a raw message payload into a check request.
    pub fn parse_request(payload: &[u8]) -> Result<Transaction> {
        serde_json::from_slice(payload).context("invalid fraud check request payload")
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
