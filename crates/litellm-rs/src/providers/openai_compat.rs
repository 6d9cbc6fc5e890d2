use crate::config::ProviderConfig;
use crate::error::Result;
use crate::http::{prepare, send_json};
use crate::providers::{require_api_key, require_base_url};
use crate::types::{ChatRequest, ChatResponse, Choice, Usage};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    #[allow(dead_code)]
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    #[serde(default)]
    index: u32,
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

pub async fn chat(client: &Client, cfg: &ProviderConfig, req: ChatRequest) -> Result<ChatResponse> {
    let base = require_base_url(cfg)?;
    let url = format!("{}/chat/completions", base.trim_end_matches('/'));
    let key = require_api_key(&req)?;

    let mut body = serde_json::json!({
        "model": req.model,
        "messages": req.messages,
    });
    if let Some(max_tokens) = req.max_tokens {
        body["max_tokens"] = serde_json::json!(max_tokens);
    }

    let builder = client.post(url).bearer_auth(key).json(&body);
    let builder = prepare(builder, req.timeout, &cfg.extra_headers);

    let (parsed, _headers) = send_json::<OpenAIChatResponse>(builder).await?;
    let choices = parsed
        .choices
        .into_iter()
        .map(|c| Choice {
            index: c.index,
            content: c.message.content.unwrap_or_default(),
            finish_reason: c.finish_reason,
        })
        .collect();

    Ok(ChatResponse {
        model: parsed.model,
        choices,
        usage: map_usage(parsed.usage),
    })
}

fn map_usage(usage: Option<OpenAIUsage>) -> Usage {
    usage.map_or_else(Usage::default, |u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    })
}
