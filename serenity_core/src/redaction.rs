use regex::Regex;
use std::sync::OnceLock;

/// Redacts common secret patterns before anything reaches the session
/// log; provider error bodies can echo auth headers back verbatim.
pub fn redact_sensitive_text(input: &str) -> String {
    static AUTH_BEARER_RE: OnceLock<Regex> = OnceLock::new();
    static AUTH_APIKEY_RE: OnceLock<Regex> = OnceLock::new();
    static QUERY_TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    static KEY_LIKE_RE: OnceLock<Regex> = OnceLock::new();

    let auth_bearer_re = AUTH_BEARER_RE.get_or_init(|| {
        Regex::new(r#"(?i)(authorization\s*:\s*bearer\s+)([A-Za-z0-9._~+/=-]+)"#).unwrap()
    });
    let auth_apikey_re = AUTH_APIKEY_RE
        .get_or_init(|| Regex::new(r#"(?i)(x-api-key\s*:\s*)([A-Za-z0-9._~+/=-]+)"#).unwrap());
    let query_token_re = QUERY_TOKEN_RE.get_or_init(|| {
        Regex::new(r#"(?i)([?&](?:token|access_token|api_key|apikey|key)=)([^&\s"']+)"#).unwrap()
    });
    let key_like_re =
        KEY_LIKE_RE.get_or_init(|| Regex::new(r#"(?i)\b(?:gsk|sk|rk)[_-][A-Za-z0-9_-]{12,}\b"#).unwrap());

    let step1 = auth_bearer_re.replace_all(input, "$1[REDACTED]").to_string();
    let step2 = auth_apikey_re
        .replace_all(&step1, "$1[REDACTED]")
        .to_string();
    let step3 = query_token_re
        .replace_all(&step2, "$1[REDACTED]")
        .to_string();
    key_like_re.replace_all(&step3, "[REDACTED]").to_string()
}
