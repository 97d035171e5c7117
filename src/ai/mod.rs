pub mod gemini;
pub mod groq;
pub mod ollama;
pub mod openai;
pub mod prompts;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Types ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl AiRequest {
    /// Request with sampling parameters taken from settings.
    pub fn from_settings(settings: &HashMap<String, String>, system: String, prompt: String) -> Self {
        Self {
            system,
            prompt,
            max_tokens: settings.get("ai_max_tokens").and_then(|v| v.parse().ok()),
            temperature: settings.get("ai_temperature").and_then(|v| v.parse().ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug)]
pub struct AiError(pub String);

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Provider Enum ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Provider {
    Groq,
    OpenAi,
    Gemini,
    Ollama,
}

pub const DEFAULT_CHAIN: &str = "groq,openai,gemini,ollama";

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Groq,
        Provider::OpenAi,
        Provider::Gemini,
        Provider::Ollama,
    ];

    fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAi),
            "gemini" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }

    fn is_enabled(&self, settings: &HashMap<String, String>) -> bool {
        settings
            .get(&format!("ai_{}_enabled", self.name()))
            .map(|v| v.as_str())
            == Some("true")
    }
}

// ── Public API ────────────────────────────────────────

/// Enabled providers in failover order.
pub fn provider_chain(settings: &HashMap<String, String>) -> Vec<Provider> {
    let chain_str = settings
        .get("ai_failover_chain")
        .cloned()
        .unwrap_or_else(|| DEFAULT_CHAIN.to_string());

    let mut chain: Vec<Provider> = Vec::new();
    for provider in chain_str.split(',').filter_map(Provider::from_str) {
        if provider.is_enabled(settings) && !chain.contains(&provider) {
            chain.push(provider);
        }
    }
    chain
}

/// Send a request through the failover chain. Returns the first successful response.
/// Blocking; async callers run it on the blocking pool.
pub fn complete(
    settings: &HashMap<String, String>,
    req: &AiRequest,
) -> Result<AiResponse, AiError> {
    let chain = provider_chain(settings);
    if chain.is_empty() {
        return Err(AiError(
            "No AI providers enabled in failover chain".into(),
        ));
    }

    let mut last_error = String::new();

    for provider in &chain {
        match call_provider(provider, settings, req) {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                log::warn!("[ai] provider {} failed: {}", provider.name(), e.0);
                last_error = e.0;
            }
        }
    }

    Err(AiError(format!(
        "All AI providers failed. Last error: {}",
        last_error
    )))
}

/// Check if any AI provider is enabled
pub fn is_enabled(settings: &HashMap<String, String>) -> bool {
    Provider::ALL.iter().any(|p| p.is_enabled(settings))
}

/// Per-provider enablement, for the status endpoint.
pub fn provider_flags(settings: &HashMap<String, String>) -> HashMap<String, bool> {
    Provider::ALL
        .iter()
        .map(|p| (p.name().to_string(), p.is_enabled(settings)))
        .collect()
}

// ── Provider Plumbing ─────────────────────────────────

const TIMEOUT_SECS: u64 = 120;

fn http_client() -> Result<reqwest::blocking::Client, AiError> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(TIMEOUT_SECS))
        .build()
        .map_err(|e| AiError(format!("HTTP client error: {}", e)))
}

/// POST `body` to `url` and decode the JSON response. Non-2xx statuses are errors.
fn post_json(
    label: &str,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
) -> Result<serde_json::Value, AiError> {
    let mut request = http_client()?
        .post(url)
        .header("Content-Type", "application/json")
        .json(body);
    if let Some(key) = bearer {
        request = request.header("Authorization", format!("Bearer {}", key));
    }

    let resp = request
        .send()
        .map_err(|e| AiError(format!("{} request failed: {}", label, e)))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        return Err(AiError(format!("{} returned {}: {}", label, status, text)));
    }

    resp.json()
        .map_err(|e| AiError(format!("{} JSON parse error: {}", label, e)))
}

/// Reply text, or an error when the provider answered with nothing usable
/// (safety block, missing choices, null content) so the chain moves on.
fn reply_text(label: &str, text: Option<&str>) -> Result<String, AiError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
        _ => Err(AiError(format!("{} returned no content", label))),
    }
}

// ── Provider Dispatch ─────────────────────────────────

fn call_provider(
    provider: &Provider,
    settings: &HashMap<String, String>,
    req: &AiRequest,
) -> Result<AiResponse, AiError> {
    match provider {
        Provider::Groq => groq::call(settings, req),
        Provider::OpenAi => openai::call(settings, req),
        Provider::Gemini => gemini::call(settings, req),
        Provider::Ollama => ollama::call(settings, req),
    }
}
