use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::ai;
use crate::db::DbPool;
use crate::models::settings::Setting;

#[get("/status")]
pub fn status(pool: &State<DbPool>) -> Json<Value> {
    let settings = Setting::all(pool);
    let chain: Vec<&str> = ai::provider_chain(&settings)
        .iter()
        .map(|p| p.name())
        .collect();
    Json(json!({
        "ok": true,
        "enabled": ai::is_enabled(&settings),
        "providers": ai::provider_flags(&settings),
        "chain": chain,
    }))
}
