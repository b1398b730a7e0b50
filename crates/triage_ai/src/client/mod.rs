use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use triage_core::domain::Severity;
use triage_core::error::{codes, AppError};

pub mod anthropic;
pub mod noop;
pub mod openai;

/// Supported AI providers. Selection is explicit: an unrecognized selector
/// is a configuration error, never a silent default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn parse(s: &str) -> Result<Provider, AppError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(AppError::new(
                codes::AI_PROVIDER_UNKNOWN,
                "Unrecognized AI provider selector",
            )
            .with_details(format!("provider={other}"))),
        }
    }
}

/// Configuration handed to `build_client` at process start. Zero values
/// fall back to the documented defaults; an empty API key selects the
/// NoOp client instead of failing startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: String::new(),
            model: String::new(),
            timeout_secs: 0,
            temperature: 0.0,
            max_tokens: 0,
        }
    }
}

impl ClientConfig {
    pub(crate) fn resolved_model(&self, default: &str) -> String {
        if self.model.trim().is_empty() {
            default.to_string()
        } else {
            self.model.clone()
        }
    }

    pub(crate) fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(60)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    pub(crate) fn resolved_temperature(&self) -> f32 {
        if self.temperature == 0.0 {
            0.7
        } else {
            self.temperature
        }
    }

    pub(crate) fn resolved_max_tokens(&self) -> u32 {
        if self.max_tokens == 0 {
            2000
        } else {
            self.max_tokens
        }
    }
}

/// Input for incident analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub title: String,
    pub description: String,
    pub logs: Vec<String>,
    pub additional_context: BTreeMap<String, String>,
}

/// Parsed analysis completion. `raw_response` preserves the unmodified
/// model output for observability and degraded-parse callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub summary: String,
    pub findings: Vec<String>,
    pub root_causes: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub suggested_severity: Severity,
    pub raw_response: String,
}

/// Input for RCA generation. `analysis` is the prior enrichment, when one
/// exists; `timeline` is the deterministic event list built by the service.
#[derive(Debug, Clone, Default)]
pub struct RcaRequest {
    pub title: String,
    pub description: String,
    pub analysis: Option<AnalysisResult>,
    pub timeline: Vec<String>,
    pub additional_context: BTreeMap<String, String>,
}

/// Parsed RCA completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RcaResult {
    pub timeline: String,
    pub root_cause: String,
    pub impact: String,
    pub resolution: String,
    pub preventive_measures: Vec<String>,
    pub lessons_learned: Vec<String>,
    pub raw_response: String,
}

/// Input for log summarization.
#[derive(Debug, Clone, Default)]
pub struct SummarizeRequest {
    pub logs: Vec<String>,
    pub additional_context: BTreeMap<String, String>,
}

/// Parsed summarization completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryResult {
    pub summary: String,
    pub key_insights: Vec<String>,
    pub alerts: Vec<String>,
    pub raw_response: String,
}

/// Uniform interface over interchangeable AI backends. Every method is a
/// single bounded network call (or a local placeholder); failures surface
/// as the shared error taxonomy, never raw transport errors.
pub trait AiClient: Send + Sync {
    fn analyze_incident(&self, req: &AnalysisRequest) -> Result<AnalysisResult, AppError>;
    fn generate_rca(&self, req: &RcaRequest) -> Result<RcaResult, AppError>;
    fn summarize_logs(&self, req: &SummarizeRequest) -> Result<SummaryResult, AppError>;
    fn classify_severity(
        &self,
        title: &str,
        description: &str,
        alert_context: &str,
    ) -> Result<Severity, AppError>;
    fn health(&self) -> Result<(), AppError>;
    fn provider_name(&self) -> &str;
    fn model_name(&self) -> &str;
}

/// Select a backend from configuration. An empty API key degrades to the
/// NoOp client; an unrecognized provider selector errors loudly.
pub fn build_client(config: &ClientConfig) -> Result<Box<dyn AiClient>, AppError> {
    if config.api_key.trim().is_empty() {
        return Ok(Box::new(noop::NoopClient::new()));
    }
    match Provider::parse(&config.provider)? {
        Provider::OpenAi => Ok(Box::new(openai::OpenAiClient::new(config.clone()))),
        Provider::Anthropic => Ok(Box::new(anthropic::AnthropicClient::new(config.clone()))),
    }
}

/// Map a ureq failure onto the error taxonomy. Deadline overruns become
/// `AI_TIMEOUT`; everything else on the wire is `AI_PROVIDER_FAILED`.
pub(crate) fn provider_error(provider: &str, err: ureq::Error) -> AppError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            AppError::new(
                codes::AI_PROVIDER_FAILED,
                format!("{provider} request failed"),
            )
            .with_details(format!("status={status} body={}", truncate_body(&body)))
        }
        ureq::Error::Transport(transport) => {
            if transport_is_timeout(&transport) {
                AppError::new(
                    codes::AI_TIMEOUT,
                    format!("{provider} request exceeded its deadline"),
                )
                .with_retryable(true)
            } else {
                AppError::new(
                    codes::AI_PROVIDER_FAILED,
                    format!("Failed to reach {provider}"),
                )
                .with_details(transport.to_string())
                .with_retryable(true)
            }
        }
    }
}

fn transport_is_timeout(transport: &ureq::Transport) -> bool {
    use std::error::Error as _;

    if transport.kind() != ureq::ErrorKind::Io {
        return false;
    }
    transport
        .source()
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .map(|io| {
            matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            )
        })
        .unwrap_or_else(|| transport.to_string().contains("timed out"))
}

fn truncate_body(body: &str) -> &str {
    let limit = 512;
    if body.len() <= limit {
        body
    } else {
        let mut end = limit;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        &body[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn provider_parse_is_case_insensitive() {
        assert_eq!(Provider::parse("OpenAI").unwrap(), Provider::OpenAi);
        assert_eq!(Provider::parse(" anthropic ").unwrap(), Provider::Anthropic);
    }

    #[test]
    fn unknown_provider_errors_loudly() {
        let err = Provider::parse("grok").unwrap_err();
        assert_eq!(err.code, codes::AI_PROVIDER_UNKNOWN);
        assert_eq!(err.details.as_deref(), Some("provider=grok"));
    }

    #[test]
    fn config_defaults_apply_to_zero_values() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.resolved_temperature(), 0.7);
        assert_eq!(config.resolved_max_tokens(), 2000);
        assert_eq!(config.resolved_model("gpt-4"), "gpt-4");

        let config = ClientConfig {
            timeout_secs: 5,
            temperature: 0.1,
            max_tokens: 64,
            model: "custom".to_string(),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.resolved_temperature(), 0.1);
        assert_eq!(config.resolved_max_tokens(), 64);
        assert_eq!(config.resolved_model("gpt-4"), "custom");
    }

    #[test]
    fn body_truncation_keeps_char_boundaries() {
        let body = "é".repeat(600);
        let cut = truncate_body(&body);
        assert!(cut.len() <= 512);
        assert!(body.starts_with(cut));
    }
}
