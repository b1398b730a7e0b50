//! Prompt construction shared by all provider backends.
//!
//! Every prompt declares the exact JSON object the model must return; the
//! parsing layer tolerates deviations, but the contract is stated up front.
//! Incident text and logs pass through secret redaction and length bounding
//! before they reach any prompt.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::client::{AnalysisRequest, RcaRequest, SummarizeRequest};

pub const ANALYSIS_SYSTEM: &str = "You are an expert incident response analyst. Analyze incidents and provide structured JSON responses.";
pub const RCA_SYSTEM: &str = "You are an expert in writing Root Cause Analysis (RCA) documents. Generate comprehensive, structured RCA documents in JSON format.";
pub const SUMMARIZE_SYSTEM: &str = "You are an expert at analyzing logs and extracting key insights. Respond with structured JSON.";
pub const CLASSIFY_SYSTEM: &str = "You are an expert incident triage engineer. Answer with exactly one word.";
pub const HEALTH_SYSTEM: &str = "You are a helpful assistant.";

const MAX_DESCRIPTION_CHARS: usize = 2000;
const MAX_LOGS_CHARS: usize = 4000;

pub fn analysis_prompt(req: &AnalysisRequest) -> String {
    let description = clean(&req.description, MAX_DESCRIPTION_CHARS);
    let logs = clean(&req.logs.join("\n"), MAX_LOGS_CHARS);
    let context = context_block(&req.additional_context);
    format!(
        r#"Analyze this incident and provide structured analysis in JSON format:

Title: {title}
Description: {description}

Related Logs:
{logs}
{context}
Respond with a JSON object containing:
{{
  "summary": "Brief summary of the incident",
  "findings": ["finding1", "finding2"],
  "root_causes": ["cause1", "cause2"],
  "recommended_actions": ["action1", "action2"],
  "suggested_severity": "critical|high|medium|low"
}}

Only respond with the JSON object, no additional text."#,
        title = req.title,
    )
}

pub fn rca_prompt(req: &RcaRequest) -> String {
    let description = clean(&req.description, MAX_DESCRIPTION_CHARS);
    let analysis = req
        .analysis
        .as_ref()
        .and_then(|a| serde_json::to_string_pretty(a).ok())
        .unwrap_or_else(|| "(no prior analysis)".to_string());
    let timeline = req.timeline.join("\n");
    let context = context_block(&req.additional_context);
    format!(
        r#"Generate a comprehensive Root Cause Analysis document for this incident:

Title: {title}
Description: {description}

Previous Analysis:
{analysis}

Timeline:
{timeline}
{context}
Respond with a JSON object containing:
{{
  "timeline": "Detailed timeline of events",
  "root_cause": "Identified root cause",
  "impact": "Impact assessment",
  "immediate_resolution": "Steps taken to resolve",
  "preventive_measures": ["measure1", "measure2"],
  "lessons_learned": ["lesson1", "lesson2"]
}}

Only respond with the JSON object, no additional text."#,
        title = req.title,
    )
}

pub fn summarize_prompt(req: &SummarizeRequest) -> String {
    let logs = clean(&req.logs.join("\n"), MAX_LOGS_CHARS);
    let context = context_block(&req.additional_context);
    format!(
        r#"Summarize these logs and extract key insights:

Logs:
{logs}
{context}
Respond with a JSON object containing:
{{
  "summary": "Brief summary of logs",
  "key_insights": ["insight1", "insight2"],
  "alerts": ["alert1", "alert2"]
}}

Only respond with the JSON object, no additional text."#,
    )
}

pub fn classify_prompt(title: &str, description: &str, alert_context: &str) -> String {
    let description = clean(description, MAX_DESCRIPTION_CHARS);
    let alert_context = clean(alert_context, MAX_DESCRIPTION_CHARS);
    format!(
        r#"Classify the severity of this incident.

Title: {title}
Description: {description}
Alert context: {alert_context}

Respond with exactly one word: critical, high, medium, or low."#,
    )
}

fn clean(text: &str, max_chars: usize) -> String {
    truncate_text(&redact_secrets(text), max_chars)
}

fn context_block(context: &BTreeMap<String, String>) -> String {
    if context.is_empty() {
        return String::new();
    }
    let mut block = String::from("\nAdditional context:\n");
    for (key, value) in context {
        block.push_str(&format!("{key}: {}\n", redact_secrets(value)));
    }
    block
}

/// Mask credential-looking values before they leave the process. Redaction
/// runs to the end of the line, matching the conservative assumption that
/// anything after a secret marker is the secret.
pub fn redact_secrets(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(api[_-]?key|password|secret|token).*").expect("redaction pattern")
    });
    re.replace_all(text, "${1}=***REDACTED***").into_owned()
}

/// Bound a prompt segment, marking the cut with an ellipsis.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
