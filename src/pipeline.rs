//! Orchestrator: one transaction through signals, decision and explanation
//!
//! Evaluators run sequentially in a fixed order (behavioral, geo, device,
//! then temporal when enabled). They are independent and could run
//! concurrently, but the
//! node-list order is an observable contract, so in-order execution is the
//! simplest conforming choice. The decision aggregator has a true data
//! dependency on all four signals and always runs last.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::decision::{DecisionAggregator, OllamaReasoner, ReasoningService};
use crate::error::PipelineError;
use crate::explain;
use crate::history::{CsvHistoryStore, HistoryStore};
use crate::signals::{behavioral, device, geo, temporal, GeoMode};
use crate::state::EvaluationState;
use crate::types::transaction::Transaction;
use crate::types::verdict::EvaluationReport;

pub struct FraudPipeline {
    history: Arc<dyn HistoryStore>,
    aggregator: DecisionAggregator,
    geo_mode: GeoMode,
    temporal_enabled: bool,
}

impl FraudPipeline {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        aggregator: DecisionAggregator,
        geo_mode: GeoMode,
        temporal_enabled: bool,
    ) -> Self {
        Self {
            history,
            aggregator,
            geo_mode,
            temporal_enabled,
        }
    }

    /// Wire the pipeline from configuration: CSV history store plus the
    /// HTTP reasoning client when enabled.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let history = Arc::new(
            CsvHistoryStore::load(&config.history.csv_path)
                .context("Failed to load history store")?,
        );

        let service: Option<Box<dyn ReasoningService>> = if config.reasoning.enabled {
            let reasoner = OllamaReasoner::new(&config.reasoning)
                .context("Failed to build reasoning client")?;
            Some(Box::new(reasoner))
        } else {
            None
        };

        info!(
            geo_mode = ?config.detection.geo_mode,
            temporal_enabled = config.detection.temporal,
            reasoning_enabled = config.reasoning.enabled,
            "Pipeline initialized"
        );

        Ok(Self::new(
            history,
            DecisionAggregator::new(service),
            config.detection.geo_mode,
            config.detection.temporal,
        ))
    }

    /// Score one transaction end to end.
    pub async fn evaluate(&self, transaction: Transaction) -> Result<EvaluationReport, PipelineError> {
        let history = self.history.history_for(&transaction.customer_id);
        let mut state = EvaluationState::new(transaction, history);

        behavioral::evaluate(&mut state);
        geo::evaluate(&mut state, self.geo_mode);
        device::evaluate(&mut state);
        if self.temporal_enabled {
            temporal::evaluate(&mut state);
        }

        self.aggregator.decide(&mut state).await?;

        let explanation = explain::build(&state, self.temporal_enabled)?;
        let verdict = state.require_verdict()?.clone();

        Ok(EvaluationReport {
            report_id: Uuid::new_v4().to_string(),
            transaction: state.transaction,
            decision: verdict.decision,
            action: verdict.action,
            explanation,
            nodes: state.nodes,
            trace: state.trace,
        })
    }
}
