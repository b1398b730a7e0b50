//! Turn raw model completions into structured results.
//!
//! Models wrap JSON in markdown fences, add prose around it, or produce no
//! JSON at all. The parsers here never fail: a decodable object is read
//! through typed optional-field structs with per-field fallback to empty,
//! and anything undecodable degrades to a result whose primary text field
//! is the raw completion.

use serde::Deserialize;

use triage_core::domain::Severity;
use triage_core::error::{codes, AppError};

use crate::client::{AnalysisResult, RcaResult, SummaryResult};

/// Strip markdown fencing and surrounding prose, leaving the best JSON
/// candidate: the span from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(stripped) = s.strip_prefix("```json") {
        s = stripped.strip_suffix("```").unwrap_or(stripped).trim();
    } else if let Some(stripped) = s.strip_prefix("```") {
        s = stripped.strip_suffix("```").unwrap_or(stripped).trim();
    }

    match (s.find('{'), s.rfind('}')) {
        (Some(start), Some(end)) if start < end => &s[start..=end],
        _ => s,
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    findings: Vec<serde_json::Value>,
    #[serde(default)]
    root_causes: Vec<serde_json::Value>,
    #[serde(default)]
    recommended_actions: Vec<serde_json::Value>,
    #[serde(default)]
    suggested_severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRca {
    #[serde(default)]
    timeline: Option<String>,
    #[serde(default)]
    root_cause: Option<String>,
    #[serde(default)]
    impact: Option<String>,
    #[serde(default)]
    immediate_resolution: Option<String>,
    #[serde(default)]
    preventive_measures: Vec<serde_json::Value>,
    #[serde(default)]
    lessons_learned: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    key_insights: Vec<serde_json::Value>,
    #[serde(default)]
    alerts: Vec<serde_json::Value>,
}

pub fn parse_analysis(raw: &str) -> AnalysisResult {
    match serde_json::from_str::<RawAnalysis>(extract_json(raw)) {
        Ok(data) => AnalysisResult {
            summary: data.summary.unwrap_or_default(),
            findings: string_items(data.findings),
            root_causes: string_items(data.root_causes),
            recommended_actions: string_items(data.recommended_actions),
            suggested_severity: data
                .suggested_severity
                .as_deref()
                .and_then(Severity::parse)
                .unwrap_or(Severity::Unknown),
            raw_response: raw.to_string(),
        },
        Err(_) => AnalysisResult {
            summary: raw.to_string(),
            findings: Vec::new(),
            root_causes: Vec::new(),
            recommended_actions: Vec::new(),
            suggested_severity: Severity::Unknown,
            raw_response: raw.to_string(),
        },
    }
}

pub fn parse_rca(raw: &str) -> RcaResult {
    match serde_json::from_str::<RawRca>(extract_json(raw)) {
        Ok(data) => RcaResult {
            timeline: data.timeline.unwrap_or_default(),
            root_cause: data.root_cause.unwrap_or_default(),
            impact: data.impact.unwrap_or_default(),
            resolution: data.immediate_resolution.unwrap_or_default(),
            preventive_measures: string_items(data.preventive_measures),
            lessons_learned: string_items(data.lessons_learned),
            raw_response: raw.to_string(),
        },
        Err(_) => RcaResult {
            timeline: raw.to_string(),
            root_cause: String::new(),
            impact: String::new(),
            resolution: String::new(),
            preventive_measures: Vec::new(),
            lessons_learned: Vec::new(),
            raw_response: raw.to_string(),
        },
    }
}

pub fn parse_summary(raw: &str) -> SummaryResult {
    match serde_json::from_str::<RawSummary>(extract_json(raw)) {
        Ok(data) => SummaryResult {
            summary: data.summary.unwrap_or_default(),
            key_insights: string_items(data.key_insights),
            alerts: string_items(data.alerts),
            raw_response: raw.to_string(),
        },
        Err(_) => SummaryResult {
            summary: raw.to_string(),
            key_insights: Vec::new(),
            alerts: Vec::new(),
            raw_response: raw.to_string(),
        },
    }
}

/// Severity classification expects a single definite word. Anything the
/// model adds around it is tolerated; an indefinite or unrecognized answer
/// is an error so the caller's keyword heuristic takes over.
pub fn parse_severity_word(raw: &str) -> Result<Severity, AppError> {
    let token = raw
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_ascii_alphanumeric());
    match Severity::parse(token) {
        Some(severity) if severity != Severity::Unknown => Ok(severity),
        _ => Err(AppError::new(
            codes::AI_PROVIDER_FAILED,
            "Model did not return a usable severity",
        )
        .with_details(format!("completion={}", raw.trim()))),
    }
}

fn string_items(values: Vec<serde_json::Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect()
}
