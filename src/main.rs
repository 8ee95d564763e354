//! Fraud Signal Pipeline - Main Entry Point
//!
//! Consumes fraud check requests from NATS, runs the signal-scoring and
//! decision pipeline, and publishes evaluation reports. Supports parallel
//! request processing; evaluations share no mutable state.

use anyhow::Result;
use fraud_signal_pipeline::{
    config::AppConfig,
    consumer::CheckRequestConsumer,
    metrics::{MetricsReporter, PipelineMetrics},
    pipeline::FraudPipeline,
    producer::ReportProducer,
};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fraud_signal_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Fraud Signal Pipeline");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");
    info!(
        geo_mode = ?config.detection.geo_mode,
        reasoning_enabled = config.reasoning.enabled,
        reasoning_timeout_ms = config.reasoning.timeout_ms,
        "Detection configuration"
    );

    // Initialize metrics
    let metrics = Arc::new(PipelineMetrics::new());

    // Build the scoring pipeline (history store + reasoning client)
    let pipeline = Arc::new(FraudPipeline::from_config(&config)?);

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = CheckRequestConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = Arc::new(ReportProducer::new(client.clone(), &config.nats.report_subject));

    // Parallel processing configuration
    let num_workers = config.pipeline.workers;
    info!(
        "Starting request processing loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", config.nats.request_subject);
    info!("Publishing reports to: {}", config.nats.report_subject);

    // Semaphore to limit concurrent evaluations
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Process requests in parallel
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        // Acquire permit (limits concurrent tasks)
        let permit = semaphore.clone().acquire_owned().await?;

        // Clone shared resources for the spawned task
        let pipeline = pipeline.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        // Spawn task to process this request
        tokio::spawn(async move {
            let start_time = Instant::now();

            match CheckRequestConsumer::parse_request(&message.payload) {
                Ok(transaction) => {
                    let tx_id = transaction.transaction_id.clone();

                    match pipeline.evaluate(transaction).await {
                        Ok(report) => {
                            let latency = start_time.elapsed();
                            let used_fallback = report
                                .trace
                                .iter()
                                .any(|line| line.contains("fallback used"));

                            metrics.record_evaluation(
                                latency,
                                &report.decision.to_string(),
                                used_fallback,
                            );

                            if let Err(e) = producer.publish(&report).await {
                                error!(
                                    transaction_id = %tx_id,
                                    error = %e,
                                    "Failed to publish evaluation report"
                                );
                            } else {
                                debug!(
                                    transaction_id = %tx_id,
                                    decision = %report.decision,
                                    action = %report.action,
                                    latency_us = latency.as_micros(),
                                    "Evaluation report published"
                                );
                            }

                            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

                            // Log progress every 100 evaluations
                            if count % 100 == 0 {
                                let throughput = metrics.get_throughput();
                                let latency_stats = metrics.get_latency_stats();
                                info!(
                                    processed = count,
                                    throughput = format!("{:.1}/s", throughput),
                                    avg_latency_us = latency_stats.mean_us,
                                    fallback_rate =
                                        format!("{:.1}%", metrics.get_fallback_rate() * 100.0),
                                    "Processing milestone"
                                );
                            }
                        }
                        Err(e) => {
                            error!(
                                transaction_id = %tx_id,
                                error = %e,
                                "Evaluation failed"
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize fraud check request");
                }
            }

            // Release permit when done
            drop(permit);
        });
    }

    // Print final summary
    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}
