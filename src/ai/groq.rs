use std::collections::HashMap;

use super::openai::chat_completion;
use super::{AiError, AiRequest, AiResponse};

const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

pub fn call(settings: &HashMap<String, String>, req: &AiRequest) -> Result<AiResponse, AiError> {
    let api_key = settings.get("ai_groq_api_key").cloned().unwrap_or_default();
    if api_key.is_empty() {
        return Err(AiError("Groq API key not configured".into()));
    }

    let model = settings
        .get("ai_groq_model")
        .cloned()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "llama-3.3-70b-versatile".to_string());

    chat_completion("Groq", "groq", GROQ_URL, &api_key, model, req)
}
