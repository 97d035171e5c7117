use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::db::DbPool;
use crate::models::generation::Generation;
use crate::models::settings::Setting;

const MAX_PAGE_SIZE: i64 = 100;

#[get("/history?<limit>&<offset>")]
pub fn list(pool: &State<DbPool>, limit: Option<i64>, offset: Option<i64>) -> Json<Value> {
    let page_size = match limit {
        Some(l) => l,
        None => Setting::get_i64(pool, "history_page_size"),
    };
    let limit = if page_size > 0 {
        page_size.min(MAX_PAGE_SIZE)
    } else {
        20
    };
    let offset = offset.unwrap_or(0).max(0);

    let items = Generation::recent(pool, limit, offset);
    Json(json!({
        "ok": true,
        "total": Generation::count(pool),
        "limit": limit,
        "offset": offset,
        "items": items,
    }))
}

#[get("/history/<id>")]
pub fn show(pool: &State<DbPool>, id: i64) -> Json<Value> {
    match Generation::find_by_id(pool, id) {
        Some(generation) => Json(json!({"ok": true, "generation": generation})),
        None => Json(json!({"ok": false, "error": "Generation not found"})),
    }
}

#[delete("/history")]
pub fn clear(pool: &State<DbPool>) -> Json<Value> {
    match Generation::clear_all(pool) {
        Ok(deleted) => {
            log::info!("[history] cleared {} generations", deleted);
            Json(json!({"ok": true, "deleted": deleted}))
        }
        Err(e) => Json(json!({"ok": false, "error": e})),
    }
}

#[get("/stats")]
pub fn stats(pool: &State<DbPool>) -> Json<Value> {
    let stats = Generation::stats(pool, Utc::now().date_naive());
    Json(json!({"ok": true, "stats": stats}))
}
