//! Lifecycle rules and AI orchestration on top of the incident store.
//!
//! Locking discipline: every enrichment follows read-snapshot, release,
//! call the provider unlocked, re-acquire only to write the result back.
//! A slow or hung provider call never stalls CRUD traffic, and a record
//! deleted mid-call stays deleted — the write-back fails with not-found
//! instead of resurrecting it.

use std::sync::Arc;

use tracing::{info, warn};

use triage_core::clock;
use triage_core::domain::{
    normalize_tags, AiAnalysis, CreateIncidentRequest, Incident, LogSummary, RcaDocument,
    Severity, Status, UpdateIncidentRequest,
};
use triage_core::error::{codes, AppError};
use triage_core::store::IncidentStore;
use triage_core::validate::{validate_create, validate_update};

use crate::client::{AiClient, AnalysisRequest, AnalysisResult, RcaRequest, SummarizeRequest};

pub struct IncidentService {
    store: Arc<IncidentStore>,
    client: Option<Arc<dyn AiClient>>,
}

impl IncidentService {
    pub fn new(store: Arc<IncidentStore>, client: Option<Arc<dyn AiClient>>) -> Self {
        Self { store, client }
    }

    pub fn create_incident(&self, req: CreateIncidentRequest) -> Result<Incident, AppError> {
        validate_create(&req)?;

        let severity = match req.severity {
            Some(severity) => severity,
            None => self.resolve_severity(&req),
        };

        let now = clock::now_rfc3339();
        let incident = self.store.insert(Incident {
            id: String::new(),
            title: req.title,
            description: req.description,
            source: req.source,
            alert_context: req.alert_context,
            severity,
            status: Status::Open,
            logs: req.logs,
            tags: normalize_tags(req.tags),
            metadata: req.metadata,
            assigned_to: req.assigned_to,
            created_at: now.clone(),
            updated_at: now,
            resolved_at: None,
            analysis: None,
            rca: None,
        });

        info!(id = %incident.id, title = %incident.title, severity = %incident.severity, "incident created");
        Ok(incident)
    }

    pub fn get_incident(&self, id: &str) -> Result<Incident, AppError> {
        self.store
            .get(id)
            .ok_or_else(|| AppError::incident_not_found(id))
    }

    pub fn list_incidents(
        &self,
        status: Option<Status>,
        severity: Option<Severity>,
    ) -> Vec<Incident> {
        self.store.list(|incident| {
            status.map_or(true, |s| incident.status == s)
                && severity.map_or(true, |s| incident.severity == s)
        })
    }

    pub fn update_incident(
        &self,
        id: &str,
        req: UpdateIncidentRequest,
    ) -> Result<Incident, AppError> {
        validate_update(&req)?;

        let updated = self.store.update(id, move |incident| {
            if let Some(title) = req.title {
                incident.title = title;
            }
            if let Some(description) = req.description {
                incident.description = description;
            }
            if let Some(severity) = req.severity {
                incident.severity = severity;
            }
            if let Some(status) = req.status {
                // resolved_at records the first terminal transition and is
                // never cleared: reopening is not an un-resolution.
                if status.is_terminal() && incident.resolved_at.is_none() {
                    incident.resolved_at = Some(clock::now_rfc3339());
                }
                incident.status = status;
            }
            if let Some(logs) = req.logs {
                incident.logs = logs;
            }
            if let Some(tags) = req.tags {
                incident.tags = normalize_tags(tags);
            }
            if let Some(metadata) = req.metadata {
                incident.metadata = metadata;
            }
            if let Some(assigned_to) = req.assigned_to {
                incident.assigned_to = Some(assigned_to);
            }
        })?;

        info!(id = %updated.id, status = %updated.status, "incident updated");
        Ok(updated)
    }

    pub fn delete_incident(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(id)?;
        info!(id, "incident deleted");
        Ok(())
    }

    /// Enrich an incident with AI analysis. Fails before any provider call
    /// when the incident does not exist or no client is configured.
    pub fn analyze_incident(&self, id: &str) -> Result<Incident, AppError> {
        let incident = self.get_incident(id)?;
        let client = self.require_client()?.clone();
        self.run_analysis(client.as_ref(), &incident)
    }

    /// Generate an RCA document. An incident without prior analysis gets
    /// one first, through the same code path as `analyze_incident`, so a
    /// single call yields both artifacts.
    pub fn generate_rca(&self, id: &str) -> Result<Incident, AppError> {
        let mut incident = self.get_incident(id)?;
        let client = self.require_client()?.clone();

        if incident.analysis.is_none() {
            incident = self.run_analysis(client.as_ref(), &incident)?;
        }

        let timeline = build_timeline(&incident);
        let request = RcaRequest {
            title: incident.title.clone(),
            description: incident.description.clone(),
            analysis: incident.analysis.as_ref().map(prior_analysis),
            timeline: timeline.clone(),
            additional_context: Default::default(),
        };

        let result = client.generate_rca(&request)?;
        let document = RcaDocument {
            timeline,
            root_cause: result.root_cause,
            impact: result.impact,
            resolution: result.resolution,
            preventive_measures: result.preventive_measures,
            lessons_learned: result.lessons_learned,
            generated_at: clock::now_rfc3339(),
            provider: client.provider_name().to_string(),
            model: client.model_name().to_string(),
        };

        let updated = self
            .store
            .update(&incident.id, move |incident| incident.rca = Some(document))?;
        info!(id = %updated.id, provider = client.provider_name(), "RCA generated");
        Ok(updated)
    }

    /// Stateless log summarization; never touches the store.
    pub fn summarize_logs(&self, logs: Vec<String>) -> Result<LogSummary, AppError> {
        let client = self.require_client()?;
        let result = client.summarize_logs(&SummarizeRequest {
            logs,
            additional_context: Default::default(),
        })?;
        Ok(LogSummary {
            summary: result.summary,
            key_insights: result.key_insights,
            alerts: result.alerts,
            generated_at: clock::now_rfc3339(),
        })
    }

    /// Reachability/configuration check on the underlying provider.
    pub fn ai_health(&self) -> Result<(), AppError> {
        self.require_client()?.health()
    }

    fn require_client(&self) -> Result<&Arc<dyn AiClient>, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::new(codes::AI_NOT_CONFIGURED, "No AI provider is configured")
        })
    }

    /// Shared analyze step: provider call with no lock held, then an atomic
    /// whole-artifact write-back. Deletes win the race against enrichment.
    fn run_analysis(
        &self,
        client: &dyn AiClient,
        incident: &Incident,
    ) -> Result<Incident, AppError> {
        let request = AnalysisRequest {
            title: incident.title.clone(),
            description: incident.description.clone(),
            logs: incident.logs.clone(),
            additional_context: Default::default(),
        };

        let result = client.analyze_incident(&request)?;
        let analysis = AiAnalysis {
            summary: result.summary,
            findings: result.findings,
            root_causes: result.root_causes,
            recommended_actions: result.recommended_actions,
            suggested_severity: result.suggested_severity,
            generated_at: clock::now_rfc3339(),
            provider: client.provider_name().to_string(),
            model: client.model_name().to_string(),
        };

        let updated = self
            .store
            .update(&incident.id, move |incident| {
                incident.analysis = Some(analysis)
            })?;
        info!(id = %updated.id, provider = client.provider_name(), "incident analyzed");
        Ok(updated)
    }

    fn resolve_severity(&self, req: &CreateIncidentRequest) -> Severity {
        if let Some(client) = &self.client {
            match client.classify_severity(&req.title, &req.description, &req.alert_context) {
                Ok(severity) if severity != Severity::Unknown => return severity,
                Ok(_) => {}
                Err(e) => {
                    warn!(code = %e.code, "severity classification failed, using keyword heuristic")
                }
            }
        }
        classify_severity_keywords(&req.title, &req.description)
    }
}

/// Deterministic keyword fallback for severity. Total: always yields a
/// definite tier, never "unknown".
pub fn classify_severity_keywords(title: &str, description: &str) -> Severity {
    const CRITICAL: [&str; 4] = ["critical", "production down", "data loss", "security breach"];
    const HIGH: [&str; 4] = ["error", "failure", "down", "unavailable"];
    const MEDIUM: [&str; 4] = ["warning", "degraded", "slow", "high memory"];

    let text = format!("{title} {description}").to_lowercase();
    if CRITICAL.iter().any(|kw| text.contains(kw)) {
        Severity::Critical
    } else if HIGH.iter().any(|kw| text.contains(kw)) {
        Severity::High
    } else if MEDIUM.iter().any(|kw| text.contains(kw)) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Ordered event list for the RCA document.
fn build_timeline(incident: &Incident) -> Vec<String> {
    let mut timeline = vec![format!("Created: {}", incident.created_at)];
    if let Some(resolved_at) = &incident.resolved_at {
        timeline.push(format!("Resolved: {resolved_at}"));
    }
    timeline
}

fn prior_analysis(analysis: &AiAnalysis) -> AnalysisResult {
    AnalysisResult {
        summary: analysis.summary.clone(),
        findings: analysis.findings.clone(),
        root_causes: analysis.root_causes.clone(),
        recommended_actions: analysis.recommended_actions.clone(),
        suggested_severity: analysis.suggested_severity,
        raw_response: String::new(),
    }
}
