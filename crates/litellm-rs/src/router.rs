use crate::config::{Config, ProviderConfig, ProviderKind};
use crate::error::{LiteLLMError, Result};

/// Provider for model ids without a `provider/` prefix.
pub const DEFAULT_PROVIDER: &str = "openai";

/// Prefix, base URL and wire protocol of every provider known out of the box.
const BUILTIN_ENDPOINTS: &[(&str, &str, ProviderKind)] = &[
    (
        "openai",
        "https://api.openai.com/v1",
        ProviderKind::OpenAICompatible,
    ),
    (
        "openrouter",
        "https://openrouter.ai/api/v1",
        ProviderKind::OpenAICompatible,
    ),
    (
        "anthropic",
        "https://api.anthropic.com",
        ProviderKind::Anthropic,
    ),
    (
        "gemini",
        "https://generativelanguage.googleapis.com/v1beta",
        ProviderKind::Gemini,
    ),
    ("xai", "https://api.x.ai/v1", ProviderKind::OpenAICompatible),
];

#[derive(Debug, Clone)]
pub struct ResolvedModel {
    pub provider: String,
    pub model: String,
    pub config: ProviderConfig,
}

/// Map a model id such as `gemini/gemini-2.5-flash` to its provider and bare model name.
///
/// Configured endpoints shadow the built-in ones.
pub fn resolve_model(model: &str, config: &Config) -> Result<ResolvedModel> {
    let (provider, bare) = model.split_once('/').unwrap_or((DEFAULT_PROVIDER, model));
    let provider_cfg = config
        .providers
        .get(provider)
        .cloned()
        .or_else(|| builtin_provider(provider))
        .ok_or_else(|| LiteLLMError::ProviderNotFound(provider.to_string()))?;

    Ok(ResolvedModel {
        provider: provider.to_string(),
        model: bare.to_string(),
        config: provider_cfg,
    })
}

/// Built-in endpoint for `provider`, if there is one.
pub fn builtin_provider(provider: &str) -> Option<ProviderConfig> {
    BUILTIN_ENDPOINTS
        .iter()
        .find(|(name, ..)| *name == provider)
        .map(|&(_, base_url, kind)| {
            ProviderConfig::default()
                .with_base_url(base_url)
                .with_kind(kind)
        })
}
