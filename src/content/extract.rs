use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::FallbackReason;

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Opening fence with optional language tag, then everything up to the
        // next fence or the end of the text.
        Regex::new(r"(?s)```[A-Za-z0-9_+.\-]*[ \t]*\r?\n?(.*?)(?:```|\z)")
            .expect("fence pattern is valid")
    })
}

/// Content of the first fenced block, or the trimmed text when there is none.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    match fence_re().captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text,
    }
}

/// Span from the first `{` to the last `}`, inclusive.
pub fn candidate_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Extract the JSON object from a model reply (fences, leading chatter, trailing
/// commentary). Errors map one-to-one onto fallback reasons.
///
/// The fenced block is tried first, then the whole reply, so backticks inside
/// string values cannot hide an otherwise valid object.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, FallbackReason> {
    let trimmed = text.trim();
    let mut candidates: Vec<&str> = Vec::new();
    for body in [strip_fences(trimmed), trimmed] {
        if let Some(candidate) = candidate_object(body) {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    if candidates.is_empty() {
        return Err(FallbackReason::NoObject);
    }

    candidates
        .into_iter()
        .find_map(parse_candidate)
        .ok_or(FallbackReason::Malformed)
}

fn parse_candidate(candidate: &str) -> Option<Map<String, Value>> {
    let value = match serde_json::from_str::<Value>(candidate) {
        Ok(v) => v,
        Err(first) => match serde_json::from_str::<Value>(&remove_trailing_commas(candidate)) {
            Ok(v) => v,
            Err(_) => {
                log::debug!("[extract] candidate object is not valid JSON: {}", first);
                return None;
            }
        },
    };

    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Drop commas that directly precede `}` or `]`, leaving string literals alone.
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &ch) in chars.iter().enumerate() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }
    out
}
