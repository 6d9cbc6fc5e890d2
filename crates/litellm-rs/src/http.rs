use crate::error::{LiteLLMError, Result};
use reqwest::header::HeaderMap;
use reqwest::RequestBuilder;
use std::collections::HashMap;
use std::time::Duration;

/// Lines of an error body kept in the returned error.
const ERROR_BODY_LINES: usize = 20;

/// Attach the per-call timeout and any configured extra headers.
pub fn prepare(
    mut builder: RequestBuilder,
    timeout: Option<Duration>,
    extra_headers: &HashMap<String, String>,
) -> RequestBuilder {
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    for (k, v) in extra_headers {
        builder = builder.header(k, v);
    }
    builder
}

/// Send a JSON request once and parse the response.
///
/// Non-2xx responses become [`LiteLLMError::Http`] carrying the status code and the
/// first lines of the body, so callers can inspect the provider's own wording.
pub async fn send_json<T: serde::de::DeserializeOwned>(
    req: RequestBuilder,
) -> Result<(T, HeaderMap)> {
    let resp = req.send().await.map_err(LiteLLMError::from)?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let text = resp.text().await.map_err(LiteLLMError::from)?;

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "provider returned error status");
        let trimmed = text
            .lines()
            .take(ERROR_BODY_LINES)
            .collect::<Vec<_>>()
            .join("\n");
        return Err(LiteLLMError::http(format!(
            "http {}: {}",
            status.as_u16(),
            trimmed
        )));
    }

    let parsed = serde_json::from_str(&text).map_err(|e| LiteLLMError::Parse(e.to_string()))?;
    Ok((parsed, headers))
}
