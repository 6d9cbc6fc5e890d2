//! Full probe runs against mocked provider endpoints.

use keycheck_core::output::OutputFormat;
use keycheck_core::{
    default_descriptors, report, run_probes, Environment, ErrorKind, ProbeSettings, Prober,
};
use litellm_rs::{LiteLLM, ProviderConfig, ProviderKind};
use serde_json::json;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client whose openai and gemini endpoints both point at `server`.
fn client_for(server: &MockServer) -> LiteLLM {
    LiteLLM::new()
        .unwrap()
        .with_provider(
            "openai",
            ProviderConfig::default()
                .with_base_url(server.uri())
                .with_kind(ProviderKind::OpenAICompatible),
        )
        .with_provider(
            "gemini",
            ProviderConfig::default()
                .with_base_url(server.uri())
                .with_kind(ProviderKind::Gemini),
        )
}

/// Secrets file defining only the first provider's key.
fn first_key_only() -> (tempfile::TempDir, Environment) {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join(".env");
    fs::write(&env_path, "OPENAI_API_KEY=sk-e2e\n").unwrap();
    // Only the file's value is allow-listed in, so stray process keys can't leak in.
    let env = Environment::load(&env_path, Vec::<String>::new()).unwrap();
    (dir, env)
}

async fn run(server: &MockServer, env: &Environment) -> (Vec<keycheck_core::ProbeResult>, u8, String) {
    let prober = Prober::new(client_for(server), ProbeSettings::default());
    let mut progress = Vec::new();
    let results = run_probes(&prober, &default_descriptors(), env, &mut progress).await;
    let mut out = Vec::new();
    let code = report(&results, OutputFormat::Text, 200, &mut out).unwrap();
    (results, code, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn one_key_present_and_working() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Hello! How can I" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, env) = first_key_only();
    let (results, code, text) = run(&server, &env).await;

    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert_eq!(results[0].response_preview.as_deref(), Some("Hello! How can I"));
    assert_eq!(results[1].error_kind, Some(ErrorKind::MissingKey));
    assert_eq!(code, 1);
    assert!(text.contains("1/2 working correctly"));
    assert!(text.contains("API key not found ($GEMINI_API_KEY)"));
}

#[tokio::test]
async fn one_key_present_but_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided: sk-e2e.",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, env) = first_key_only();
    let (results, code, text) = run(&server, &env).await;

    assert_eq!(results[0].error_kind, Some(ErrorKind::InvalidKey));
    assert!(results[0]
        .error_detail
        .as_deref()
        .unwrap()
        .contains("invalid_api_key"));
    assert_eq!(results[1].error_kind, Some(ErrorKind::MissingKey));
    assert_eq!(code, 1);
    assert!(text.contains("0/2 working correctly"));
    assert!(text.contains("❌ OpenAI GPT-4: Invalid API key"));
    assert!(text.contains("Details: http error: http 401"));
}

#[tokio::test]
async fn both_keys_working_exits_zero() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Hi" } }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = Environment::from_pairs([("OPENAI_API_KEY", "sk-a"), ("GEMINI_API_KEY", "g-b")]);
    let (results, code, text) = run(&server, &env).await;

    assert!(results.iter().all(|r| r.success));
    assert_eq!(code, 0);
    assert!(text.contains("2/2 working correctly"));
    assert!(!text.contains("Failing APIs:"));
}

#[tokio::test]
async fn gemini_without_candidates_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "OTHER" }
        })))
        .mount(&server)
        .await;

    let env = Environment::from_pairs([("GEMINI_API_KEY", "g-b")]);
    let (results, _, _) = run(&server, &env).await;

    assert_eq!(results[0].error_kind, Some(ErrorKind::MissingKey));
    assert_eq!(results[1].error_kind, Some(ErrorKind::InvalidResponse));
}
