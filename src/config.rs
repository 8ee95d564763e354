//! Configuration management for the fraud signal pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

use crate::signals::GeoMode;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub history: HistoryConfig,
    pub reasoning: ReasoningConfig,
    pub detection: DetectionConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming fraud check requests
    pub request_subject: String,
    /// Subject for outgoing evaluation reports
    pub report_subject: String,
}

/// History store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Path to the transaction history CSV
    pub csv_path: String,
}

/// External reasoning service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReasoningConfig {
    /// When false, every decision uses the deterministic fallback rule
    #[serde(default = "default_reasoning_enabled")]
    pub enabled: bool,
    /// Base URL of the Ollama-compatible endpoint
    pub url: String,
    /// Model name passed to the generate endpoint
    #[serde(default = "default_reasoning_model")]
    pub model: String,
    /// Hard bound on the single reasoning call; no retries follow a timeout
    #[serde(default = "default_reasoning_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_reasoning_enabled() -> bool {
    true
}

fn default_reasoning_model() -> String {
    "mistral".to_string()
}

fn default_reasoning_timeout_ms() -> u64 {
    5_000
}

/// Detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Geo scoring mode for this deployment; the two modes are never
    /// blended within one evaluation
    #[serde(default)]
    pub geo_mode: GeoMode,
    /// When false, the temporal evaluator is skipped and reports carry
    /// only the behavioral/geo/device signals
    #[serde(default = "default_temporal_enabled")]
    pub temporal: bool,
}

fn default_temporal_enabled() -> bool {
    true
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of concurrent evaluations
    pub workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "fraud.check".to_string(),
                report_subject: "fraud.reports".to_string(),
            },
            history: HistoryConfig {
                csv_path: "data/transactions.csv".to_string(),
            },
            reasoning: ReasoningConfig {
                enabled: true,
                url: "http://localhost:11434".to_string(),
                model: "mistral".to_string(),
                timeout_ms: 5_000,
            },
            detection: DetectionConfig {
                geo_mode: GeoMode::Categorical,
                temporal: true,
            },
            pipeline: PipelineConfig { workers: 4 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}
