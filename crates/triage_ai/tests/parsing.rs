use pretty_assertions::assert_eq;

use triage_ai::parsing::{
    extract_json, parse_analysis, parse_rca, parse_severity_word, parse_summary,
};
use triage_core::domain::Severity;

#[test]
fn fenced_json_with_language_tag() {
    let raw = "```json\n{\"summary\":\"x\",\"findings\":[\"a\"]}\n```";
    let result = parse_analysis(raw);
    assert_eq!(result.summary, "x");
    assert_eq!(result.findings, vec!["a".to_string()]);
    assert_eq!(result.raw_response, raw);
}

#[test]
fn fenced_json_without_language_tag() {
    let raw = "```\n{\"summary\":\"y\"}\n```";
    let result = parse_analysis(raw);
    assert_eq!(result.summary, "y");
}

#[test]
fn no_json_degrades_to_raw_summary() {
    let raw = "no json here at all";
    let result = parse_analysis(raw);
    assert_eq!(result.summary, raw);
    assert!(result.findings.is_empty());
    assert!(result.root_causes.is_empty());
    assert!(result.recommended_actions.is_empty());
    assert_eq!(result.suggested_severity, Severity::Unknown);
}

#[test]
fn json_is_recovered_from_surrounding_prose() {
    let raw = "Here is the analysis you asked for: {\"summary\":\"y\"} hope that helps!";
    let result = parse_analysis(raw);
    assert_eq!(result.summary, "y");
}

#[test]
fn missing_fields_become_empty_not_errors() {
    let result = parse_analysis("{\"findings\":[\"only finding\"]}");
    assert_eq!(result.summary, "");
    assert_eq!(result.findings, vec!["only finding".to_string()]);
    assert_eq!(result.suggested_severity, Severity::Unknown);
}

#[test]
fn non_string_list_items_are_skipped() {
    let result = parse_analysis("{\"summary\":\"s\",\"findings\":[\"a\",7,null,\"b\"]}");
    assert_eq!(result.findings, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn suggested_severity_parses_leniently() {
    let result = parse_analysis("{\"suggested_severity\":\" HIGH \"}");
    assert_eq!(result.suggested_severity, Severity::High);
    let result = parse_analysis("{\"suggested_severity\":\"apocalyptic\"}");
    assert_eq!(result.suggested_severity, Severity::Unknown);
}

#[test]
fn rca_parse_and_fallback() {
    let raw = r#"{"timeline":"t","root_cause":"rc","impact":"i","immediate_resolution":"ir","preventive_measures":["p"],"lessons_learned":["l"]}"#;
    let result = parse_rca(raw);
    assert_eq!(result.timeline, "t");
    assert_eq!(result.root_cause, "rc");
    assert_eq!(result.impact, "i");
    assert_eq!(result.resolution, "ir");
    assert_eq!(result.preventive_measures, vec!["p".to_string()]);
    assert_eq!(result.lessons_learned, vec!["l".to_string()]);

    let degraded = parse_rca("the model rambled instead");
    assert_eq!(degraded.timeline, "the model rambled instead");
    assert_eq!(degraded.root_cause, "");
    assert!(degraded.preventive_measures.is_empty());
}

#[test]
fn summary_parse_and_fallback() {
    let result = parse_summary("{\"summary\":\"s\",\"key_insights\":[\"k\"],\"alerts\":[\"a\"]}");
    assert_eq!(result.summary, "s");
    assert_eq!(result.key_insights, vec!["k".to_string()]);
    assert_eq!(result.alerts, vec!["a".to_string()]);

    let degraded = parse_summary("```broken");
    assert_eq!(degraded.summary, "```broken");
    assert!(degraded.key_insights.is_empty());
}

#[test]
fn extract_json_slices_first_to_last_brace() {
    assert_eq!(extract_json("prefix {\"a\":1} suffix"), "{\"a\":1}");
    assert_eq!(extract_json("   {\"a\":{\"b\":2}}  "), "{\"a\":{\"b\":2}}");
    assert_eq!(extract_json("no braces"), "no braces");
}

#[test]
fn severity_word_tolerates_decoration() {
    assert_eq!(parse_severity_word("High").unwrap(), Severity::High);
    assert_eq!(parse_severity_word("critical.\n").unwrap(), Severity::Critical);
    assert_eq!(parse_severity_word("\"medium\"").unwrap(), Severity::Medium);
    assert_eq!(
        parse_severity_word("low, because impact is contained").unwrap(),
        Severity::Low
    );
}

#[test]
fn indefinite_severity_word_is_an_error() {
    assert!(parse_severity_word("unknown").is_err());
    assert!(parse_severity_word("it depends").is_err());
    assert!(parse_severity_word("").is_err());
}
