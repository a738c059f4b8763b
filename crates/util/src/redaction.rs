use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

/// Text substituted for every occurrence of a secret.
pub const REDACTION_MARKER: &str = "[REDACTED]";

// Tried in order when the secret shares a character with REDACTION_MARKER.
const FALLBACK_MARKER_CHARS: [char; 4] = ['*', '#', '~', '%'];
const FALLBACK_MARKER_LEN: usize = 10;

/// Replaces every literal occurrence of `secret` in `text`.
///
/// A missing or empty secret leaves the text untouched. The replacement
/// shares no character with the secret, so no occurrence can span a
/// replacement boundary and the result never contains the secret.
pub fn redact_secret(text: &str, secret: Option<&str>) -> String {
    let Some(secret) = secret.filter(|secret| !secret.is_empty()) else {
        return text.to_string();
    };
    text.replace(secret, &marker_for(secret))
}

fn marker_for(secret: &str) -> Cow<'static, str> {
    if !REDACTION_MARKER.chars().any(|ch| secret.contains(ch)) {
        return Cow::Borrowed(REDACTION_MARKER);
    }
    let fill = FALLBACK_MARKER_CHARS
        .into_iter()
        .chain('!'..='~')
        .chain('\u{2500}'..=char::MAX)
        .find(|ch| !secret.contains(*ch))
        .unwrap_or('*');
    Cow::Owned(fill.to_string().repeat(FALLBACK_MARKER_LEN))
}

/// Masks credential-looking values (`--admintoken x`, `token: x`) in free text.
///
/// Used for payloads logged before any executor call, when the token to redact
/// may not be known yet.
pub fn redact_sensitive(text: &str) -> String {
    let mut redacted = text.to_string();
    for pattern in sensitive_patterns() {
        redacted = pattern
            .replace_all(&redacted, |caps: &Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                format!("{prefix}{REDACTION_MARKER}")
            })
            .into_owned();
    }
    redacted
}

/// Replaces string values stored under credential-like keys, recursively.
pub fn redact_json_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if is_sensitive_key(key) && entry.is_string() {
                    *entry = Value::String(REDACTION_MARKER.to_string());
                } else {
                    redact_json_fields(entry);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_fields),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    lowered.contains("token") || lowered.contains("secret") || lowered.contains("password")
}

fn sensitive_patterns() -> &'static Vec<Regex> {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        vec![
            Regex::new(r"(?i)(--admintoken[\s=]+)([^\s]+)").expect("valid admintoken pattern"),
            Regex::new(r#"(?i)((?:admin[\s_-]?token|token|secret|password)"?\s*[:=]\s*"?)([^\s",;]+)"#)
                .expect("valid credential pattern"),
        ]
    });
    &PATTERNS
}
