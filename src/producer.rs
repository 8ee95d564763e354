//! NATS producer for evaluation reports

use crate::types::verdict::EvaluationReport;
use anyhow::Result;
use async_nats::Client;
use tracing::debug;

/// Producer for publishing evaluation reports to NATS
#[derive(Clone)]
pub struct ReportProducer {
    client: Client,
    subject: String,
}

impl ReportProducer {
    /// Create a new report producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish an evaluation report
    pub async fn publish(&self, report: &EvaluationReport) -> Result<()> {
        let payload = serde_json::to_vec(report)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            report_id = %report.report_id,
            transaction_id = %report.transaction.transaction_id,
            decision = %report.decision,
            action = %report.action,
            "Published evaluation report"
        );

        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
