use crate::text::truncate_chars;
use crate::types::ErrorKind;

/// Classify a provider error by its text. First matching rule wins.
pub fn classify_error(raw: &str) -> ErrorKind {
    let msg = raw.to_lowercase();
    if msg.contains("quota") || msg.contains("insufficient_quota") {
        ErrorKind::QuotaExceeded
    } else if msg.contains("invalid") && msg.contains("key") {
        ErrorKind::InvalidKey
    } else if msg.contains("authentication") || msg.contains("unauthorized") {
        ErrorKind::AuthFailed
    } else if msg.contains("rate") && msg.contains("limit") {
        ErrorKind::RateLimited
    } else {
        ErrorKind::Unknown
    }
}

/// One-line explanation for `kind`. Unknown errors echo the start of `raw`.
pub fn friendly_message(kind: ErrorKind, raw: &str, unknown_chars: usize) -> String {
    match kind {
        ErrorKind::MissingKey => "API key not found".to_string(),
        ErrorKind::InvalidResponse => "Unexpected response format".to_string(),
        ErrorKind::QuotaExceeded => "Quota exceeded - check billing".to_string(),
        ErrorKind::InvalidKey => "Invalid API key".to_string(),
        ErrorKind::AuthFailed => "Authentication failed".to_string(),
        ErrorKind::RateLimited => "Rate limited - try again later".to_string(),
        ErrorKind::Unknown => truncate_chars(raw, unknown_chars).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_messages() {
        assert_eq!(
            classify_error("You exceeded your current quota"),
            ErrorKind::QuotaExceeded
        );
        assert_eq!(
            classify_error(r#"{"type": "insufficient_quota"}"#),
            ErrorKind::QuotaExceeded
        );
    }

    #[test]
    fn quota_beats_rate_limit() {
        assert_eq!(
            classify_error("Rate limit reached: quota exhausted"),
            ErrorKind::QuotaExceeded
        );
    }

    #[test]
    fn invalid_key_needs_both_words() {
        assert_eq!(
            classify_error("http 401: Incorrect API key provided, code invalid_api_key"),
            ErrorKind::InvalidKey
        );
        assert_eq!(
            classify_error("INVALID_ARGUMENT: API key not valid"),
            ErrorKind::InvalidKey
        );
        assert_eq!(classify_error("invalid request body"), ErrorKind::Unknown);
    }

    #[test]
    fn invalid_key_beats_authentication() {
        assert_eq!(
            classify_error("AuthenticationError: invalid x-api-key"),
            ErrorKind::InvalidKey
        );
    }

    #[test]
    fn auth_failures() {
        assert_eq!(
            classify_error("AuthenticationError: bad credentials"),
            ErrorKind::AuthFailed
        );
        assert_eq!(classify_error("http 401: Unauthorized"), ErrorKind::AuthFailed);
    }

    #[test]
    fn rate_limit_needs_both_words() {
        assert_eq!(
            classify_error("http 429: Rate limit exceeded"),
            ErrorKind::RateLimited
        );
        assert_eq!(classify_error("generation rate too high"), ErrorKind::Unknown);
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(
            classify_error("request timed out: operation timed out"),
            ErrorKind::Unknown
        );
        assert_eq!(classify_error(""), ErrorKind::Unknown);
    }

    #[test]
    fn unknown_friendly_message_is_truncated() {
        let raw = "x".repeat(250);
        let msg = friendly_message(ErrorKind::Unknown, &raw, 100);
        assert_eq!(msg.len(), 100);
        assert!(raw.starts_with(&msg));
    }

    #[test]
    fn known_kinds_ignore_raw_text() {
        assert_eq!(
            friendly_message(ErrorKind::RateLimited, "whatever", 100),
            "Rate limited - try again later"
        );
    }
}
