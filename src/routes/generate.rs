use rocket::serde::json::Json;
use rocket::tokio::task;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ai::{self, prompts, AiRequest};
use crate::content::keywords::{extract_keywords, generate_hashtags};
use crate::content::{self, GenerationRequest, Platform};
use crate::db::DbPool;
use crate::models::generation::Generation;
use crate::models::settings::Setting;

const KEYWORD_LIMIT: usize = 10;

// ── Request Types ─────────────────────────────────────

/// Business details without a platform, for generating every platform at once.
#[derive(Debug, Deserialize)]
pub struct GenerateAllRequest {
    #[serde(default)]
    pub business_name: String,
    pub business_type: String,
    pub product: String,
    pub audience: String,
    #[serde(default)]
    pub offer: String,
    #[serde(default)]
    pub tone: String,
}

// ── Helpers ───────────────────────────────────────────

pub(crate) fn with_default_tone(pool: &DbPool, mut request: GenerationRequest) -> GenerationRequest {
    if request.tone.trim().is_empty() {
        request.tone = Setting::get_or(pool, "default_tone", "Professional");
    }
    request
}

fn missing_response(missing: &[&str]) -> Json<Value> {
    Json(json!({
        "ok": false,
        "error": format!("Missing required fields: {}", missing.join(", ")),
        "missing": missing,
    }))
}

/// Reply text from the first provider that answers. `None` when no provider
/// is enabled or every provider failed.
async fn fetch_reply(pool: &DbPool, request: &GenerationRequest) -> Option<String> {
    let settings = Setting::all(pool);
    if !ai::is_enabled(&settings) {
        log::debug!("[generate] no AI provider enabled");
        return None;
    }

    let req = AiRequest::from_settings(
        &settings,
        prompts::system(),
        prompts::for_platform(request, request.platform.shape()),
    );

    match task::spawn_blocking(move || ai::complete(&settings, &req)).await {
        Ok(Ok(resp)) => {
            log::info!(
                "[generate] {} reply from {} ({})",
                request.platform,
                resp.provider,
                resp.model
            );
            Some(resp.text)
        }
        Ok(Err(e)) => {
            log::warn!("[generate] {}", e);
            None
        }
        Err(e) => {
            log::error!("[generate] provider task failed: {}", e);
            None
        }
    }
}

/// Generate, interpret and store copy for one platform.
async fn run(pool: &DbPool, request: &GenerationRequest) -> Value {
    let reply = fetch_reply(pool, request).await;
    let result = content::interpret(reply.as_deref(), request.platform.shape(), request);

    let keywords = extract_keywords(&request.keyword_text(), KEYWORD_LIMIT);
    let hashtags = generate_hashtags(&keywords, request.platform);

    let id = match Generation::create(pool, request, &result, &keywords) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("[generate] failed to store {} result: {}", request.platform, e);
            None
        }
    };

    json!({
        "id": id,
        "saved": id.is_some(),
        "result": result,
        "keywords": keywords,
        "hashtags": hashtags,
    })
}

// ── Routes ────────────────────────────────────────────

#[post("/generate", format = "json", data = "<body>")]
pub async fn generate(pool: &State<DbPool>, body: Json<GenerationRequest>) -> Json<Value> {
    let request = with_default_tone(pool, body.into_inner());
    let missing = request.missing_inputs();
    if !missing.is_empty() {
        return missing_response(&missing);
    }

    let mut out = run(pool, &request).await;
    out["ok"] = json!(true);
    Json(out)
}

#[post("/generate/all", format = "json", data = "<body>")]
pub async fn generate_all(pool: &State<DbPool>, body: Json<GenerateAllRequest>) -> Json<Value> {
    let body = body.into_inner();
    let base = with_default_tone(
        pool,
        GenerationRequest {
            business_name: body.business_name,
            business_type: body.business_type,
            product: body.product,
            audience: body.audience,
            offer: body.offer,
            tone: body.tone,
            platform: Platform::GoogleAds,
        },
    );
    let missing = base.missing_inputs();
    if !missing.is_empty() {
        return missing_response(&missing);
    }

    let mut results = serde_json::Map::new();
    for platform in Platform::ALL {
        let request = base.for_platform(platform);
        results.insert(platform.id().to_string(), run(pool, &request).await);
    }

    Json(json!({"ok": true, "results": results}))
}

#[get("/shapes")]
pub fn shapes() -> Json<Value> {
    let shapes: Vec<Value> = Platform::ALL
        .iter()
        .map(|p| {
            let shape = p.shape();
            json!({
                "platform": p.id(),
                "label": p.label(),
                "fields": shape.fields,
                "metrics": shape.metrics,
            })
        })
        .collect();
    Json(json!({"ok": true, "shapes": shapes}))
}
