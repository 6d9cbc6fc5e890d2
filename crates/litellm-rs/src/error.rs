use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiteLLMError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("provider not found: {0}")]
    ProviderNotFound(String),
    #[error("missing api key for provider: {0}")]
    MissingApiKey(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl LiteLLMError {
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}

impl From<reqwest::Error> for LiteLLMError {
    fn from(err: reqwest::Error) -> Self {
        let msg = error_chain(&err);
        if err.is_timeout() {
            Self::Timeout(msg)
        } else {
            Self::Http(msg)
        }
    }
}

/// `err` followed by each of its causes, joined with `": "`.
///
/// reqwest's own message only names the URL; the reason (refused, DNS, TLS) lives in the sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Some layers repeat their inner error verbatim.
        if !msg.ends_with(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}


pub type Result<T> = std::result::Result<T, LiteLLMError>;
