use serde_json::{json, Value};
use std::collections::HashMap;

use super::{post_json, reply_text, AiError, AiRequest, AiResponse};

pub fn call(settings: &HashMap<String, String>, req: &AiRequest) -> Result<AiResponse, AiError> {
    let api_key = settings
        .get("ai_gemini_api_key")
        .cloned()
        .unwrap_or_default();
    if api_key.is_empty() {
        return Err(AiError("Gemini API key not configured".into()));
    }

    let model = settings
        .get("ai_gemini_model")
        .cloned()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "gemini-1.5-flash".to_string());

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
        model, api_key
    );

    // Gemini has no system role on this endpoint; prepend it to the prompt.
    let body = json!({
        "contents": [{"parts": [{"text": format!("{}\n\n{}", req.system, req.prompt)}]}],
        "generationConfig": {
            "maxOutputTokens": req.max_tokens.unwrap_or(4000),
            "temperature": req.temperature.unwrap_or(0.8),
            "responseMimeType": "application/json"
        }
    });

    let json = post_json("Gemini", &url, None, &body)?;
    let text = reply_text("Gemini", candidate_text(&json))?;

    Ok(AiResponse {
        text,
        provider: "gemini".into(),
        model,
    })
}

/// Text of the first candidate. Safety-blocked candidates carry no `content`.
fn candidate_text(json: &Value) -> Option<&str> {
    json.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}
