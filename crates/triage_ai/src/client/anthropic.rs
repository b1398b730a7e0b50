use serde::{Deserialize, Serialize};
use std::time::Duration;

use triage_core::domain::Severity;
use triage_core::error::{codes, AppError};

use super::{
    provider_error, AiClient, AnalysisRequest, AnalysisResult, ClientConfig, RcaRequest,
    RcaResult, SummarizeRequest, SummaryResult,
};
use crate::parsing;
use crate::prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
const SUMMARIZE_MAX_TOKENS: u32 = 1500;
const CLASSIFY_MAX_TOKENS: u32 = 8;
const HEALTH_MAX_TOKENS: u32 = 5;

/// Anthropic messages-API backend.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    api_key: String,
    model: String,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

impl AnthropicClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            model: config.resolved_model(DEFAULT_ANTHROPIC_MODEL),
            timeout: config.timeout(),
            temperature: config.resolved_temperature(),
            max_tokens: config.resolved_max_tokens(),
            api_key: config.api_key,
        }
    }

    fn call(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AppError> {
        let request = MessagesRequest {
            model: &self.model,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let response = ureq::post(ANTHROPIC_API_URL)
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", ANTHROPIC_VERSION)
            .timeout(self.timeout)
            .send_json(serde_json::to_value(&request).map_err(|e| {
                AppError::new(
                    codes::AI_PROVIDER_FAILED,
                    "Failed to encode anthropic request",
                )
                .with_details(e.to_string())
            })?);

        match response {
            Ok(r) if r.status() == 200 => {
                let decoded: MessagesResponse = r.into_json().map_err(|e| {
                    AppError::new(
                        codes::AI_PROVIDER_FAILED,
                        "Failed to decode anthropic response",
                    )
                    .with_details(e.to_string())
                })?;
                let text = decoded
                    .content
                    .into_iter()
                    .next()
                    .map(|block| block.text)
                    .unwrap_or_default();
                if text.trim().is_empty() {
                    return Err(AppError::new(
                        codes::AI_PROVIDER_FAILED,
                        "anthropic returned an empty completion",
                    ));
                }
                Ok(text)
            }
            Ok(r) => Err(AppError::new(
                codes::AI_PROVIDER_FAILED,
                "anthropic request failed",
            )
            .with_details(format!("status={}", r.status()))),
            Err(e) => Err(provider_error("anthropic", e)),
        }
    }
}

impl AiClient for AnthropicClient {
    fn analyze_incident(&self, req: &AnalysisRequest) -> Result<AnalysisResult, AppError> {
        let completion = self.call(
            prompts::ANALYSIS_SYSTEM,
            &prompts::analysis_prompt(req),
            self.temperature,
            self.max_tokens,
        )?;
        Ok(parsing::parse_analysis(&completion))
    }

    fn generate_rca(&self, req: &RcaRequest) -> Result<RcaResult, AppError> {
        let completion = self.call(
            prompts::RCA_SYSTEM,
            &prompts::rca_prompt(req),
            self.temperature,
            self.max_tokens,
        )?;
        Ok(parsing::parse_rca(&completion))
    }

    fn summarize_logs(&self, req: &SummarizeRequest) -> Result<SummaryResult, AppError> {
        let completion = self.call(
            prompts::SUMMARIZE_SYSTEM,
            &prompts::summarize_prompt(req),
            self.temperature,
            SUMMARIZE_MAX_TOKENS,
        )?;
        Ok(parsing::parse_summary(&completion))
    }

    fn classify_severity(
        &self,
        title: &str,
        description: &str,
        alert_context: &str,
    ) -> Result<Severity, AppError> {
        let completion = self.call(
            prompts::CLASSIFY_SYSTEM,
            &prompts::classify_prompt(title, description, alert_context),
            0.0,
            CLASSIFY_MAX_TOKENS,
        )?;
        parsing::parse_severity_word(&completion)
    }

    fn health(&self) -> Result<(), AppError> {
        self.call(prompts::HEALTH_SYSTEM, "ping", 0.0, HEALTH_MAX_TOKENS)
            .map(|_| ())
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
