use pretty_assertions::assert_eq;

use triage_ai::client::noop::NoopClient;
use triage_ai::client::{AiClient, AnalysisRequest, RcaRequest, SummarizeRequest};
use triage_core::domain::Severity;
use triage_core::error::codes;

#[test]
fn enrichment_methods_return_labeled_placeholders() {
    let client = NoopClient::new();

    let analysis = client
        .analyze_incident(&AnalysisRequest::default())
        .unwrap();
    assert!(analysis.summary.contains("not configured"));
    assert!(analysis.findings.is_empty());
    assert_eq!(analysis.suggested_severity, Severity::Unknown);

    let rca = client.generate_rca(&RcaRequest::default()).unwrap();
    assert!(rca.timeline.contains("not configured"));
    assert!(rca.preventive_measures.is_empty());

    let summary = client
        .summarize_logs(&SummarizeRequest::default())
        .unwrap();
    assert!(summary.summary.contains("not configured"));
    assert!(summary.alerts.is_empty());
}

#[test]
fn health_and_classification_report_missing_configuration() {
    let client = NoopClient::new();
    assert_eq!(client.health().unwrap_err().code, codes::AI_NOT_CONFIGURED);
    assert_eq!(
        client.classify_severity("t", "d", "").unwrap_err().code,
        codes::AI_NOT_CONFIGURED
    );
    assert_eq!(client.provider_name(), "noop");
    assert_eq!(client.model_name(), "none");
}
