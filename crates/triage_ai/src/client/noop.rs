use triage_core::domain::Severity;
use triage_core::error::{codes, AppError};

use super::{
    AiClient, AnalysisRequest, AnalysisResult, RcaRequest, RcaResult, SummarizeRequest,
    SummaryResult,
};

/// Placeholder client selected when no API key is configured. Enrichment
/// methods return clearly-labeled placeholder results instead of erroring,
/// so callers degrade gracefully; health and severity classification report
/// the missing configuration.
#[derive(Debug, Clone, Default)]
pub struct NoopClient;

impl NoopClient {
    pub fn new() -> Self {
        Self
    }

    fn not_configured() -> AppError {
        AppError::new(codes::AI_NOT_CONFIGURED, "AI provider not configured")
    }
}

impl AiClient for NoopClient {
    fn analyze_incident(&self, _req: &AnalysisRequest) -> Result<AnalysisResult, AppError> {
        Ok(AnalysisResult {
            summary: "AI analysis not available (provider not configured)".to_string(),
            findings: Vec::new(),
            root_causes: Vec::new(),
            recommended_actions: Vec::new(),
            suggested_severity: Severity::Unknown,
            raw_response: String::new(),
        })
    }

    fn generate_rca(&self, _req: &RcaRequest) -> Result<RcaResult, AppError> {
        Ok(RcaResult {
            timeline: "AI RCA generation not available (provider not configured)".to_string(),
            root_cause: String::new(),
            impact: String::new(),
            resolution: String::new(),
            preventive_measures: Vec::new(),
            lessons_learned: Vec::new(),
            raw_response: String::new(),
        })
    }

    fn summarize_logs(&self, _req: &SummarizeRequest) -> Result<SummaryResult, AppError> {
        Ok(SummaryResult {
            summary: "Log summarization not available (provider not configured)".to_string(),
            key_insights: Vec::new(),
            alerts: Vec::new(),
            raw_response: String::new(),
        })
    }

    fn classify_severity(
        &self,
        _title: &str,
        _description: &str,
        _alert_context: &str,
    ) -> Result<Severity, AppError> {
        // The service falls back to its keyword heuristic on this error.
        Err(Self::not_configured())
    }

    fn health(&self) -> Result<(), AppError> {
        Err(Self::not_configured())
    }

    fn provider_name(&self) -> &str {
        "noop"
    }

    fn model_name(&self) -> &str {
        "none"
    }
}
