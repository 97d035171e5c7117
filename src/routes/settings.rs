use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::content::Tone;
use crate::db::DbPool;
use crate::models::settings::Setting;

/// Prefix of a masked secret as returned by `GET /settings`.
const MASK: &str = "••••";

/// Checks values that the rest of the service parses.
fn validate(key: &str, value: &str) -> Result<(), String> {
    let ok = match key {
        "ai_temperature" => value.parse::<f32>().map(|t| (0.0..=2.0).contains(&t)).unwrap_or(false),
        "ai_max_tokens" => value.parse::<u32>().map(|n| n > 0).unwrap_or(false),
        "history_page_size" => value.parse::<i64>().map(|n| n > 0).unwrap_or(false),
        "default_tone" => Tone::ALL
            .iter()
            .any(|t| t.name().eq_ignore_ascii_case(value.trim())),
        k if k.ends_with("_enabled") => value == "true" || value == "false",
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(format!("Invalid value for {}", key))
    }
}

#[get("/settings")]
pub fn show(pool: &State<DbPool>) -> Json<Value> {
    Json(json!({"ok": true, "settings": Setting::all_masked(pool)}))
}

#[post("/settings", format = "json", data = "<body>")]
pub fn save(pool: &State<DbPool>, body: Json<HashMap<String, String>>) -> Json<Value> {
    let mut updates = HashMap::new();
    for (key, value) in body.into_inner() {
        if !Setting::is_editable(&key) {
            return Json(json!({"ok": false, "error": format!("Setting not editable: {}", key)}));
        }
        // Echoed masked keys mean "unchanged".
        if key.ends_with("_api_key") && value.starts_with(MASK) {
            continue;
        }
        if let Err(e) = validate(&key, &value) {
            return Json(json!({"ok": false, "error": e}));
        }
        updates.insert(key, value);
    }

    match Setting::set_many(pool, &updates) {
        Ok(()) => {
            log::info!("[settings] updated {} keys", updates.len());
            Json(json!({"ok": true, "updated": updates.len()}))
        }
        Err(e) => Json(json!({"ok": false, "error": e})),
    }
}
