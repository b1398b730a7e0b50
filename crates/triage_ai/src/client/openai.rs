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

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const SUMMARIZE_MAX_TOKENS: u32 = 1500;
const CLASSIFY_MAX_TOKENS: u32 = 8;
const HEALTH_MAX_TOKENS: u32 = 5;

/// OpenAI chat-completions backend.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_key: String,
    model: String,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            model: config.resolved_model(DEFAULT_OPENAI_MODEL),
            timeout: config.timeout(),
            temperature: config.resolved_temperature(),
            max_tokens: config.resolved_max_tokens(),
            api_key: config.api_key,
        }
    }

    /// One bounded POST to the chat completions endpoint; returns the first
    /// choice's text. Never called while any store lock is held.
    fn call(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AppError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
            max_tokens,
        };

        let response = ureq::post(OPENAI_API_URL)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .send_json(serde_json::to_value(&request).map_err(|e| {
                AppError::new(codes::AI_PROVIDER_FAILED, "Failed to encode openai request")
                    .with_details(e.to_string())
            })?);

        match response {
            Ok(r) if r.status() == 200 => {
                let decoded: ChatResponse = r.into_json().map_err(|e| {
                    AppError::new(codes::AI_PROVIDER_FAILED, "Failed to decode openai response")
                        .with_details(e.to_string())
                })?;
                let content = decoded
                    .choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
                    .unwrap_or_default();
                if content.trim().is_empty() {
                    return Err(AppError::new(
                        codes::AI_PROVIDER_FAILED,
                        "openai returned an empty completion",
                    ));
                }
                Ok(content)
            }
            Ok(r) => Err(AppError::new(
                codes::AI_PROVIDER_FAILED,
                "openai request failed",
            )
            .with_details(format!("status={}", r.status()))),
            Err(e) => Err(provider_error("openai", e)),
        }
    }
}

impl AiClient for OpenAiClient {
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
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
