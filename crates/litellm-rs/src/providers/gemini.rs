use crate::config::ProviderConfig;
use crate::error::Result;
use crate::http::{prepare, send_json};
use crate::providers::{require_api_key, require_base_url};
use crate::types::{ChatRequest, ChatResponse, Choice, Usage};
use reqwest::Client;
use serde_json::Value;

pub async fn chat(client: &Client, cfg: &ProviderConfig, req: ChatRequest) -> Result<ChatResponse> {
    let base = require_base_url(cfg)?;
    let key = require_api_key(&req)?;
    let url = format!(
        "{}/models/{}:generateContent",
        base.trim_end_matches('/'),
        req.model
    );

    let contents = req
        .messages
        .iter()
        .map(|m| {
            // Gemini only knows "user" and "model".
            let role = if m.role == "assistant" { "model" } else { "user" };
            serde_json::json!({
                "role": role,
                "parts": [{ "text": m.content }]
            })
        })
        .collect::<Vec<_>>();

    let mut generation_config = serde_json::Map::new();
    if let Some(max_tokens) = req.max_tokens {
        generation_config.insert("maxOutputTokens".into(), serde_json::json!(max_tokens));
    }

    let mut body = serde_json::json!({
        "contents": contents,
    });
    if !generation_config.is_empty() {
        body["generationConfig"] = Value::Object(generation_config);
    }

    let builder = client.post(url).header("x-goog-api-key", key).json(&body);
    let builder = prepare(builder, req.timeout, &cfg.extra_headers);

    let (resp, _headers) = send_json::<Value>(builder).await?;

    Ok(ChatResponse {
        model: resp
            .get("modelVersion")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        choices: extract_choices(&resp),
        usage: parse_usage(&resp),
    })
}

fn extract_choices(resp: &Value) -> Vec<Choice> {
    let Some(candidates) = resp.get("candidates").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let mut text = String::new();
            if let Some(parts) = candidate
                .get("content")
                .and_then(|v| v.get("parts"))
                .and_then(|v| v.as_array())
            {
                for part in parts {
                    if let Some(piece) = part.get("text").and_then(|v| v.as_str()) {
                        text.push_str(piece);
                    }
                }
            }
            Choice {
                index: candidate
                    .get("index")
                    .and_then(|v| v.as_u64())
                    .map_or(i as u32, |v| v as u32),
                content: text,
                finish_reason: candidate
                    .get("finishReason")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            }
        })
        .collect()
}

fn parse_usage(resp: &Value) -> Usage {
    if let Some(meta) = resp.get("usageMetadata").and_then(|v| v.as_object()) {
        return Usage {
            prompt_tokens: meta
                .get("promptTokenCount")
                .and_then(|v| v.as_u64())
                .map(|v| v as u32),
            completion_tokens: meta
                .get("candidatesTokenCount")
                .and_then(|v| v.as_u64())
                .map(|v| v as u32),
            total_tokens: meta
                .get("totalTokenCount")
                .and_then(|v| v.as_u64())
                .map(|v| v as u32),
        };
    }
    Usage::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_candidate_parts() {
        let resp = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hel" }, { "text": "lo" }] },
                "finishReason": "MAX_TOKENS"
            }]
        });
        let choices = extract_choices(&resp);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].content, "Hello");
        assert_eq!(choices[0].finish_reason.as_deref(), Some("MAX_TOKENS"));
    }

    #[test]
    fn missing_candidates_yield_no_choices() {
        let resp = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(extract_choices(&resp).is_empty());
    }
}
