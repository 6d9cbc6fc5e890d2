use async_trait::async_trait;
use litellm_rs::{ChatRequest, ChatResponse, LiteLLM};
use std::io::Write;

use crate::classify::{classify_error, friendly_message};
use crate::config::ProbeSettings;
use crate::env::Environment;
use crate::text::truncate_chars;
use crate::types::{ErrorKind, ProbeResult, ProviderDescriptor};

/// Something that can answer one chat completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, req: ChatRequest) -> litellm_rs::Result<ChatResponse>;
}

#[async_trait]
impl CompletionBackend for LiteLLM {
    async fn complete(&self, req: ChatRequest) -> litellm_rs::Result<ChatResponse> {
        self.completion(req).await
    }
}

pub struct Prober<B> {
    backend: B,
    settings: ProbeSettings,
}

impl<B: CompletionBackend> Prober<B> {
    pub fn new(backend: B, settings: ProbeSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Check one provider. Never fails: every outcome becomes a [`ProbeResult`].
    ///
    /// Progress markers go to `progress`; write errors there are ignored.
    pub async fn probe<W: Write>(
        &self,
        descriptor: &ProviderDescriptor,
        env: &Environment,
        progress: &mut W,
    ) -> ProbeResult {
        let Some(api_key) = env.get(&descriptor.credential_var) else {
            tracing::info!(provider = %descriptor.display_name, "credential missing, skipping call");
            return ProbeResult::failing(
                descriptor,
                ErrorKind::MissingKey,
                format!(
                    "❌ {}: API key not found (${})",
                    descriptor.display_name, descriptor.credential_var
                ),
                None,
            );
        };

        let _ = write!(
            progress,
            "Testing {} ({})... ",
            descriptor.display_name, descriptor.model_id
        );
        let _ = progress.flush();

        let req = ChatRequest::new(&descriptor.model_id)
            .message("user", &self.settings.prompt)
            .max_tokens(self.settings.max_tokens)
            .timeout(self.settings.timeout())
            .api_key(api_key);

        let (marker, result) = match self.backend.complete(req).await {
            Ok(resp) => match resp.content() {
                Some(text) => {
                    let preview = truncate_chars(text, self.settings.preview_chars);
                    ("✅", ProbeResult::working(descriptor, preview))
                }
                None => (
                    "⚠️",
                    ProbeResult::failing(
                        descriptor,
                        ErrorKind::InvalidResponse,
                        format!(
                            "⚠️ {}: {}",
                            descriptor.display_name,
                            friendly_message(ErrorKind::InvalidResponse, "", 0)
                        ),
                        None,
                    ),
                ),
            },
            Err(err) => {
                let raw = err.to_string();
                let kind = classify_error(&raw);
                tracing::debug!(provider = %descriptor.display_name, %kind, error = %raw, "probe failed");
                let friendly = friendly_message(kind, &raw, self.settings.unknown_detail_chars);
                (
                    "❌",
                    ProbeResult::failing(
                        descriptor,
                        kind,
                        format!("❌ {}: {}", descriptor.display_name, friendly),
                        Some(raw),
                    ),
                )
            }
        };

        let _ = writeln!(progress, "{marker}");
        result
    }
}

/// Probe every descriptor in order, one at a time.
pub async fn run_probes<B: CompletionBackend, W: Write>(
    prober: &Prober<B>,
    descriptors: &[ProviderDescriptor],
    env: &Environment,
    progress: &mut W,
) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        results.push(prober.probe(descriptor, env, progress).await);
    }
    results
}
