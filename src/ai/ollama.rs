use serde_json::{json, Value};
use std::collections::HashMap;

use super::{post_json, reply_text, AiError, AiRequest, AiResponse};

pub fn call(settings: &HashMap<String, String>, req: &AiRequest) -> Result<AiResponse, AiError> {
    let base_url = settings
        .get("ai_ollama_url")
        .cloned()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "http://localhost:11434".to_string());
    let model = settings
        .get("ai_ollama_model")
        .cloned()
        .unwrap_or_default();

    if model.is_empty() {
        return Err(AiError("Ollama model not configured".into()));
    }

    let url = format!("{}/api/chat", base_url.trim_end_matches('/'));

    let body = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": req.system},
            {"role": "user", "content": req.prompt}
        ],
        "stream": false,
        "format": "json",
        "options": {
            "temperature": req.temperature.unwrap_or(0.8),
            "num_predict": req.max_tokens.unwrap_or(4000)
        }
    });

    let json = post_json("Ollama", &url, None, &body)?;
    let text = reply_text("Ollama", message_text(&json))?;

    Ok(AiResponse {
        text,
        provider: "ollama".into(),
        model,
    })
}

fn message_text(json: &Value) -> Option<&str> {
    json.get("message")?.get("content")?.as_str()
}
