use crate::config::ProviderConfig;
use crate::error::{LiteLLMError, Result};
use crate::types::ChatRequest;

pub mod anthropic;
pub mod gemini;
pub mod openai_compat;

/// The key carried by the request. Providers have no other source for it.
pub fn require_api_key(req: &ChatRequest) -> Result<String> {
    req.api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| LiteLLMError::MissingApiKey(req.model.clone()))
}

pub(crate) fn require_base_url(cfg: &ProviderConfig) -> Result<String> {
    cfg.base_url
        .clone()
        .ok_or_else(|| LiteLLMError::Config("base_url required".into()))
}
