use crate::config::ProviderConfig;
use crate::error::{LiteLLMError, Result};
use crate::http::{prepare, send_json};
use crate::providers::{require_api_key, require_base_url};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, Choice, Usage};
use reqwest::Client;
use serde_json::Value;

const DEFAULT_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

pub async fn chat(client: &Client, cfg: &ProviderConfig, req: ChatRequest) -> Result<ChatResponse> {
    let base = require_base_url(cfg)?;
    let url = format!("{}/v1/messages", base.trim_end_matches('/'));
    let key = require_api_key(&req)?;

    let (system, messages) = split_system(req.messages)?;

    let mut body = serde_json::json!({
        "model": req.model,
        "messages": messages,
        "max_tokens": req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
    });
    if !system.is_empty() {
        body["system"] = serde_json::json!(system);
    }

    let builder = client
        .post(url)
        .header("x-api-key", key)
        .header("anthropic-version", DEFAULT_VERSION)
        .json(&body);
    let builder = prepare(builder, req.timeout, &cfg.extra_headers);

    let (parsed, _headers) = send_json::<Value>(builder).await?;

    Ok(ChatResponse {
        model: parsed
            .get("model")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        choices: extract_choices(&parsed),
        usage: parse_usage(&parsed),
    })
}

/// Anthropic takes system prompts as a top-level field, not as messages.
fn split_system(messages: Vec<ChatMessage>) -> Result<(String, Vec<ChatMessage>)> {
    let mut system = Vec::new();
    let mut rest = Vec::with_capacity(messages.len());
    for message in messages {
        match message.role.as_str() {
            "system" => system.push(message.content),
            "user" | "assistant" => rest.push(message),
            other => {
                return Err(LiteLLMError::Config(format!(
                    "unsupported anthropic role: {other}"
                )))
            }
        }
    }
    Ok((system.join("\n\n"), rest))
}

fn extract_choices(resp: &Value) -> Vec<Choice> {
    let Some(content) = resp.get("content").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    if content.is_empty() {
        return Vec::new();
    }
    let mut text = String::new();
    for part in content {
        if part.get("type").and_then(|v| v.as_str()) == Some("text") {
            if let Some(piece) = part.get("text").and_then(|v| v.as_str()) {
                text.push_str(piece);
            }
        }
    }
    vec![Choice {
        index: 0,
        content: text,
        finish_reason: resp
            .get("stop_reason")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    }]
}

fn parse_usage(resp: &Value) -> Usage {
    let usage = resp.get("usage").and_then(|v| v.as_object());
    if let Some(u) = usage {
        let prompt = u
            .get("input_tokens")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32);
        let completion = u
            .get("output_tokens")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32);
        return Usage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt.zip(completion).map(|(p, c)| p + c),
        };
    }
    Usage::default()
}
