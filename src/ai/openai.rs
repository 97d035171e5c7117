use serde_json::{json, Value};
use std::collections::HashMap;

use super::{post_json, reply_text, AiError, AiRequest, AiResponse};

pub fn call(settings: &HashMap<String, String>, req: &AiRequest) -> Result<AiResponse, AiError> {
    let api_key = settings
        .get("ai_openai_api_key")
        .cloned()
        .unwrap_or_default();
    if api_key.is_empty() {
        return Err(AiError("OpenAI API key not configured".into()));
    }

    let model = settings
        .get("ai_openai_model")
        .cloned()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "gpt-4o-mini".to_string());

    let base_url = settings
        .get("ai_openai_base_url")
        .cloned()
        .unwrap_or_default();
    let base_url = if base_url.is_empty() {
        "https://api.openai.com/v1".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };

    let url = format!("{}/chat/completions", base_url);
    chat_completion("OpenAI", "openai", &url, &api_key, model, req)
}

/// POST an OpenAI-style chat completion and return the first choice's content.
/// Shared by every provider that speaks the `/chat/completions` dialect.
pub(super) fn chat_completion(
    label: &str,
    provider: &str,
    url: &str,
    api_key: &str,
    model: String,
    req: &AiRequest,
) -> Result<AiResponse, AiError> {
    let body = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": req.system},
            {"role": "user", "content": req.prompt}
        ],
        "max_tokens": req.max_tokens.unwrap_or(4000),
        "temperature": req.temperature.unwrap_or(0.8)
    });

    let json = post_json(label, url, Some(api_key), &body)?;
    let text = reply_text(label, message_content(&json))?;

    Ok(AiResponse {
        text,
        provider: provider.into(),
        model,
    })
}

fn message_content(json: &Value) -> Option<&str> {
    json.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}
