use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Incident urgency classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }

    /// Parse a severity label. Unrecognized input is `None`; callers decide
    /// their own fallback (the parser degrades to `Unknown`, the classifier
    /// treats it as a failed call).
    pub fn parse(s: &str) -> Option<Severity> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "unknown" => Some(Severity::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident lifecycle stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    /// States that settle `resolved_at`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Resolved | Status::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked operational incident.
///
/// Notes:
/// - Timestamps are RFC3339 UTC strings minted by `clock::now_rfc3339`.
/// - `resolved_at` is set exactly once, at the first transition into a
///   terminal status, and is never cleared afterwards: it records a
///   historical fact, not current state.
/// - `analysis` and `rca` are owned by this incident and replaced wholesale
///   on regeneration, never merged field by field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub alert_context: String,
    pub severity: Severity,
    pub status: Status,
    pub logs: Vec<String>,
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub resolved_at: Option<String>,
    pub analysis: Option<AiAnalysis>,
    pub rca: Option<RcaDocument>,
}

/// AI-derived findings attached to an incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiAnalysis {
    pub summary: String,
    pub findings: Vec<String>,
    pub root_causes: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub suggested_severity: Severity,
    pub generated_at: String,
    pub provider: String,
    pub model: String,
}

/// AI-derived root cause analysis document attached to an incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RcaDocument {
    pub timeline: Vec<String>,
    pub root_cause: String,
    pub impact: String,
    pub resolution: String,
    pub preventive_measures: Vec<String>,
    pub lessons_learned: Vec<String>,
    pub generated_at: String,
    pub provider: String,
    pub model: String,
}

/// Input for incident creation. Title and description are required non-empty;
/// everything else defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIncidentRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub alert_context: String,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIncidentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub logs: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// Result of a standalone log summarization. Not attached to any incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogSummary {
    pub summary: String,
    pub key_insights: Vec<String>,
    pub alerts: Vec<String>,
    pub generated_at: String,
}

/// Canonicalize a tag list: trim, drop empties, sort, dedupe.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
