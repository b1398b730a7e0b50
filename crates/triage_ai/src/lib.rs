pub mod client;
pub mod parsing;
pub mod prompts;
pub mod service;

#[cfg(test)]
mod tests {
    use super::client::{build_client, ClientConfig};
    use triage_core::error::codes;

    #[test]
    fn missing_api_key_selects_noop() {
        let client = build_client(&ClientConfig::default()).expect("build");
        assert_eq!(client.provider_name(), "noop");
        let err = client.health().unwrap_err();
        assert_eq!(err.code, codes::AI_NOT_CONFIGURED);
    }

    #[test]
    fn unknown_selector_is_rejected_even_with_a_key() {
        let config = ClientConfig {
            provider: "gemini".to_string(),
            api_key: "sk-test".to_string(),
            ..Default::default()
        };
        let err = match build_client(&config) {
            Ok(_) => panic!("expected build_client to reject unknown provider"),
            Err(err) => err,
        };
        assert_eq!(err.code, codes::AI_PROVIDER_UNKNOWN);
    }

    #[test]
    fn backends_report_provider_and_default_model() {
        let openai = build_client(&ClientConfig {
            provider: "openai".to_string(),
            api_key: "sk-test".to_string(),
            ..Default::default()
        })
        .expect("openai");
        assert_eq!(openai.provider_name(), "openai");
        assert_eq!(openai.model_name(), "gpt-4");

        let anthropic = build_client(&ClientConfig {
            provider: "anthropic".to_string(),
            api_key: "sk-test".to_string(),
            ..Default::default()
        })
        .expect("anthropic");
        assert_eq!(anthropic.provider_name(), "anthropic");
        assert_eq!(anthropic.model_name(), "claude-3-5-sonnet-20241022");
    }
}
