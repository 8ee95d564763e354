//! External reasoning service client
//!
//! The decision step consults an Ollama-style generate endpoint with the
//! four signal scores and a strict JSON-schema instruction. The service is
//! effectively non-deterministic and unreliable, so it sits behind the
//! `ReasoningService` trait with every failure mode mapped to a typed
//! `ReasoningError`; the aggregator converts those into the fallback rule.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ReasoningConfig;
use crate::decision::extract::extract_json_object;
use crate::error::ReasoningError;
use crate::state::SignalResult;
use crate::types::verdict::Verdict;

/// The four signal results handed to the decision step. Behavioral, geo and
/// device are mandatory; temporal is optional per deployment.
#[derive(Debug, Clone)]
pub struct DecisionSignals {
    pub behavioral: SignalResult,
    pub geo: SignalResult,
    pub device: SignalResult,
    pub temporal: Option<SignalResult>,
}

/// One-shot decision proposal. Implementations must bound their own latency;
/// the aggregator never retries.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn propose(&self, signals: &DecisionSignals) -> Result<Verdict, ReasoningError>;
}

/// HTTP client for an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaReasoner {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaReasoner {
    pub fn new(config: &ReasoningConfig) -> Result<Self, ReasoningError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ReasoningError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn build_prompt(signals: &DecisionSignals) -> String {
        let mut signal_lines = format!(
            "- Behavioral risk: {} ({})\n- Geo risk: {} ({})\n- Device risk: {} ({})\n",
            signals.behavioral.risk,
            signals.behavioral.reason,
            signals.geo.risk,
            signals.geo.reason,
            signals.device.risk,
            signals.device.reason,
        );
        if let Some(temporal) = &signals.temporal {
            signal_lines.push_str(&format!(
                "- Temporal risk: {} ({})\n",
                temporal.risk, temporal.reason
            ));
        }

        format!(
            "You are a banking fraud decision engine.\n\n\
             Signals:\n{signal_lines}\n\
             Return ONLY valid JSON. No markdown, no explanations outside JSON.\n\n\
             Schema:\n\
             {{\n\
               \"decision\": \"VERY_LOW_RISK | LOW_RISK | MID_RISK | HIGH_RISK\",\n\
               \"action\": \"ALLOW | REVIEW | BLOCK\",\n\
               \"reasoning\": \"short explanation\"\n\
             }}\n"
        )
    }

    /// Parse the raw completion text into a verdict, tolerating prose around
    /// the JSON object.
    fn parse_completion(text: &str) -> Result<Verdict, ReasoningError> {
        let json = extract_json_object(text)
            .ok_or_else(|| ReasoningError::NoJsonFound(snippet(text)))?;

        serde_json::from_str::<Verdict>(json)
            .map_err(|e| ReasoningError::MalformedResponse(format!("{e}; body: {}", snippet(json))))
    }
}

/// Short prefix of a service response, safe to embed in error text.
fn snippet(text: &str) -> String {
    const MAX: usize = 120;
    if text.len() <= MAX {
        text.to_string()
    } else {
        let mut end = MAX;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

#[async_trait]
impl ReasoningService for OllamaReasoner {
    async fn propose(&self, signals: &DecisionSignals) -> Result<Verdict, ReasoningError> {
        let prompt = Self::build_prompt(signals);
        let url = format!("{}/api/generate", self.base_url);

        debug!(url = %url, model = %self.model, "Requesting reasoning service");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt: &prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReasoningError::Timeout(self.timeout_ms)
                } else {
                    ReasoningError::Unreachable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ReasoningError::Unreachable(format!(
                "status {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::MalformedResponse(e.to_string()))?;

        Self::parse_completion(&body.response)
    }
}
