use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider to probe: what to call it, which model to hit, and where its key lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "model")]
    pub model_id: String,
    #[serde(rename = "api_key_env")]
    pub credential_var: String,
}

impl ProviderDescriptor {
    pub fn new(
        display_name: impl Into<String>,
        model_id: impl Into<String>,
        credential_var: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            model_id: model_id.into(),
            credential_var: credential_var.into(),
        }
    }

    /// Name of the first empty field, if any.
    pub fn empty_field(&self) -> Option<&'static str> {
        if self.display_name.trim().is_empty() {
            return Some("name");
        }
        if self.model_id.trim().is_empty() {
            return Some("model");
        }
        if self.credential_var.trim().is_empty() {
            return Some("api_key_env");
        }
        None
    }
}

/// Built-in providers, probed in this order.
pub fn default_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        ProviderDescriptor::new("OpenAI GPT-4", "gpt-4o", "OPENAI_API_KEY"),
        ProviderDescriptor::new(
            "Google Gemini 2.5 Flash",
            "gemini/gemini-2.5-flash",
            "GEMINI_API_KEY",
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingKey,
    InvalidResponse,
    QuotaExceeded,
    InvalidKey,
    AuthFailed,
    RateLimited,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MissingKey => "missing_key",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::QuotaExceeded => "quota_exceeded",
            ErrorKind::InvalidKey => "invalid_key",
            ErrorKind::AuthFailed => "auth_failed",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of probing one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub provider: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_preview: Option<String>,
}

impl ProbeResult {
    pub fn working(descriptor: &ProviderDescriptor, preview: impl Into<String>) -> Self {
        Self {
            provider: descriptor.display_name.clone(),
            success: true,
            message: format!("✅ {}: Working correctly", descriptor.display_name),
            error_kind: None,
            error_detail: None,
            model: Some(descriptor.model_id.clone()),
            response_preview: Some(preview.into()),
        }
    }

    pub fn failing(
        descriptor: &ProviderDescriptor,
        kind: ErrorKind,
        message: impl Into<String>,
        detail: Option<String>,
    ) -> Self {
        Self {
            provider: descriptor.display_name.clone(),
            success: false,
            message: message.into(),
            error_kind: Some(kind),
            error_detail: detail,
            model: None,
            response_preview: None,
        }
    }
}
