#![cfg(test)]

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::collections::HashMap;

use crate::content::interpret::interpret_at;
use crate::content::keywords::extract_keywords;
use crate::content::{FallbackReason, GenerationRequest, Platform, Source};
use crate::db::{run_migrations, seed_defaults, DbPool};
use crate::export::{self, Format};
use crate::models::generation::{Generation, GenerationStats};
use crate::models::settings::Setting;

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Fresh in-memory SQLite pool with migrations and seed defaults applied.
/// Named shared-cache DB so every pooled connection sees the same data.
fn test_pool() -> DbPool {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:adcopy_testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    run_migrations(&pool).expect("Failed to run migrations");
    seed_defaults(&pool).expect("Failed to seed defaults");
    pool
}

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn request(platform: Platform, tone: &str) -> GenerationRequest {
    GenerationRequest {
        business_name: "Bean There".into(),
        business_type: "coffee roaster".into(),
        product: "Organic coffee beans".into(),
        audience: "busy parents".into(),
        offer: "20% off".into(),
        tone: tone.into(),
        platform,
    }
}

/// Interpret `raw` at a fixed instant and store it, like the generate route does.
fn store(pool: &DbPool, req: &GenerationRequest, raw: Option<&str>, now: &str) -> i64 {
    let result = interpret_at(raw, req.platform.shape(), req, at(now));
    let keywords = extract_keywords(&req.keyword_text(), 10);
    Generation::create(pool, req, &result, &keywords).unwrap()
}

const GOOGLE_REPLY: &str = r#"Sure! ```json
{"headline": "Fresh Organic Beans", "description": "Roasted weekly for busy parents.", "cta": "Shop Now", "keywords": "organic coffee, beans"}
```"#;

// ═══════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════

#[test]
fn settings_set_and_get() {
    let pool = test_pool();
    Setting::set(&pool, "test_key", "hello").unwrap();
    assert_eq!(Setting::get(&pool, "test_key"), Some("hello".to_string()));
}

#[test]
fn settings_get_or_default() {
    let pool = test_pool();
    assert_eq!(Setting::get_or(&pool, "nonexistent", "fallback"), "fallback");
    Setting::set(&pool, "exists", "val").unwrap();
    assert_eq!(Setting::get_or(&pool, "exists", "fallback"), "val");
}

#[test]
fn settings_get_bool_and_i64() {
    let pool = test_pool();
    Setting::set(&pool, "flag_one", "1").unwrap();
    assert!(Setting::get_bool(&pool, "flag_one"));
    assert!(!Setting::get_bool(&pool, "ai_groq_enabled"));
    assert!(!Setting::get_bool(&pool, "missing_flag"));
    assert_eq!(Setting::get_i64(&pool, "history_page_size"), 20);
    assert_eq!(Setting::get_i64(&pool, "missing"), 0);
}

#[test]
fn settings_set_many_and_upsert() {
    let pool = test_pool();
    let mut map = HashMap::new();
    map.insert("ai_temperature".to_string(), "0.5".to_string());
    map.insert("default_tone".to_string(), "Luxury".to_string());
    Setting::set_many(&pool, &map).unwrap();
    assert_eq!(Setting::get(&pool, "ai_temperature"), Some("0.5".to_string()));
    assert_eq!(Setting::get(&pool, "default_tone"), Some("Luxury".to_string()));
}

#[test]
fn seed_defaults_keeps_user_values() {
    let pool = test_pool();
    Setting::set(&pool, "ai_max_tokens", "1200").unwrap();
    seed_defaults(&pool).unwrap();
    assert_eq!(Setting::get(&pool, "ai_max_tokens"), Some("1200".to_string()));
    assert_eq!(
        Setting::get(&pool, "ai_failover_chain"),
        Some(crate::ai::DEFAULT_CHAIN.to_string())
    );
}

#[test]
fn settings_mask_api_keys() {
    let pool = test_pool();
    Setting::set(&pool, "ai_openai_api_key", "sk-secret-abcd").unwrap();
    let masked = Setting::all_masked(&pool);
    assert_eq!(masked["ai_openai_api_key"], "••••abcd");
    assert_eq!(masked["ai_groq_api_key"], "");
    assert_eq!(masked["ai_openai_model"], "gpt-4o-mini");
}

#[test]
fn settings_editable_keys() {
    assert!(Setting::is_editable("ai_groq_api_key"));
    assert!(Setting::is_editable("default_tone"));
    assert!(Setting::is_editable("history_page_size"));
    assert!(!Setting::is_editable("admin_password"));
}

#[test]
fn provider_settings_drive_the_chain() {
    let pool = test_pool();
    assert!(!crate::ai::is_enabled(&Setting::all(&pool)));
    Setting::set(&pool, "ai_gemini_enabled", "true").unwrap();
    let settings = Setting::all(&pool);
    assert!(crate::ai::is_enabled(&settings));
    assert_eq!(
        crate::ai::provider_chain(&settings),
        vec![crate::ai::Provider::Gemini]
    );
}

#[test]
fn omitted_tone_uses_configured_default() {
    let pool = test_pool();
    Setting::set(&pool, "default_tone", "Luxury").unwrap();

    let body = r#"{"business_type":"shop","product":"Widgets","audience":"pros","platform":"seo"}"#;
    let req: GenerationRequest = serde_json::from_str(body).unwrap();
    assert!(req.tone.is_empty());
    let req = crate::routes::generate::with_default_tone(&pool, req);
    assert_eq!(req.tone, "Luxury");

    let explicit: GenerationRequest = serde_json::from_str(
        r#"{"business_type":"shop","product":"Widgets","audience":"pros","platform":"seo","tone":"Urgent"}"#,
    )
    .unwrap();
    let explicit = crate::routes::generate::with_default_tone(&pool, explicit);
    assert_eq!(explicit.tone, "Urgent");
}

// ═══════════════════════════════════════════════════════════
// Generations
// ═══════════════════════════════════════════════════════════

#[test]
fn generation_store_api_result() {
    let pool = test_pool();
    let req = request(Platform::GoogleAds, "exciting");
    let id = store(&pool, &req, Some(GOOGLE_REPLY), "2026-03-01T10:00:00Z");
    assert!(id > 0);

    let g = Generation::find_by_id(&pool, id).unwrap();
    assert_eq!(g.platform, "google_ads");
    assert_eq!(g.source, "api");
    assert_eq!(g.fallback_reason, None);
    assert_eq!(g.tone, "Exciting");
    assert_eq!(g.fields["headline"], "Fresh Organic Beans");
    assert_eq!(g.fields["cta"], "Shop Now");
    assert!(g.metrics.contains_key("estimated_ctr"));
    assert!(g.keywords.contains(&"organic".to_string()));
    assert_eq!(g.created_at.format("%Y-%m-%d %H:%M").to_string(), "2026-03-01 10:00");
}

#[test]
fn generation_store_fallback_result() {
    let pool = test_pool();
    let req = request(Platform::Seo, "Professional");
    let id = store(&pool, &req, Some("no json here"), "2026-03-01T10:00:00Z");

    let g = Generation::find_by_id(&pool, id).unwrap();
    assert_eq!(g.source, "fallback");
    assert_eq!(g.fallback_reason.as_deref(), Some("no_object"));
    let names: Vec<&str> = g.ordered_fields().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["seo_title", "meta_description", "h1", "keywords"]);
    assert!(g.ordered_fields().iter().all(|(_, v)| !v.is_empty()));
}

#[test]
fn generation_find_missing() {
    let pool = test_pool();
    assert!(Generation::find_by_id(&pool, 999).is_none());
}

#[test]
fn generation_list_recent_and_count() {
    let pool = test_pool();
    let mut ids = Vec::new();
    for platform in Platform::ALL {
        ids.push(store(&pool, &request(platform, "friendly"), None, "2026-03-01T10:00:00Z"));
    }
    assert_eq!(Generation::count(&pool), 4);

    let listed: Vec<i64> = Generation::list(&pool, 10, 0).iter().map(|g| g.id).collect();
    assert_eq!(listed, ids);

    let recent: Vec<i64> = Generation::recent(&pool, 2, 0).iter().map(|g| g.id).collect();
    assert_eq!(recent, vec![ids[3], ids[2]]);

    let page: Vec<i64> = Generation::recent(&pool, 2, 2).iter().map(|g| g.id).collect();
    assert_eq!(page, vec![ids[1], ids[0]]);
}

#[test]
fn generation_find_many_orders_and_dedups() {
    let pool = test_pool();
    let a = store(&pool, &request(Platform::Facebook, ""), None, "2026-03-01T10:00:00Z");
    let b = store(&pool, &request(Platform::Instagram, ""), None, "2026-03-01T10:00:00Z");
    let found: Vec<i64> = Generation::find_many(&pool, &[b, a, b, 12345])
        .iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(found, vec![a, b]);
}

#[test]
fn generation_clear_all() {
    let pool = test_pool();
    store(&pool, &request(Platform::Seo, ""), None, "2026-03-01T10:00:00Z");
    store(&pool, &request(Platform::Seo, ""), None, "2026-03-01T10:00:00Z");
    assert_eq!(Generation::clear_all(&pool).unwrap(), 2);
    assert_eq!(Generation::count(&pool), 0);
    assert_eq!(Generation::clear_all(&pool).unwrap(), 0);
}

#[test]
fn generation_stats() {
    let pool = test_pool();
    let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert_eq!(Generation::stats(&pool, day), GenerationStats::default());

    store(&pool, &request(Platform::GoogleAds, "urgent"), Some(GOOGLE_REPLY), "2026-03-01T09:00:00Z");
    store(&pool, &request(Platform::Facebook, "luxury"), None, "2026-03-01T10:00:00Z");
    store(&pool, &request(Platform::Facebook, "luxury"), None, "2026-02-28T23:00:00Z");
    store(&pool, &request(Platform::Seo, "urgent"), None, "2026-02-27T08:00:00Z");

    let stats = Generation::stats(&pool, day);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.platforms_used, 3);
    // Urgent and Luxury tie; the earlier-used tone wins.
    assert_eq!(stats.most_common_tone.as_deref(), Some("Urgent"));
    assert_eq!(stats.generated_today, 2);
    assert_eq!(stats.api_count, 1);
    assert_eq!(stats.fallback_count, 3);
}

// ═══════════════════════════════════════════════════════════
// Interpret → store → export
// ═══════════════════════════════════════════════════════════

#[test]
fn absent_reply_is_stored_as_unavailable_fallback() {
    let pool = test_pool();
    let req = request(Platform::Instagram, "emotional");
    let result = interpret_at(None, req.platform.shape(), &req, at("2026-03-01T10:00:00Z"));
    assert_eq!(result.source, Source::Fallback);
    assert_eq!(result.fallback_reason, Some(FallbackReason::Unavailable));

    let id = Generation::create(&pool, &req, &result, &[]).unwrap();
    let g = Generation::find_by_id(&pool, id).unwrap();
    assert_eq!(g.fallback_reason.as_deref(), Some("unavailable"));
    assert_eq!(g.fields, result.fields);
    assert_eq!(g.metrics, result.metrics);
}

#[test]
fn stored_generations_export_in_every_format() {
    let pool = test_pool();
    let req = request(Platform::GoogleAds, "professional");
    store(&pool, &req, Some(GOOGLE_REPLY), "2026-03-01T10:00:00Z");
    store(&pool, &req.for_platform(Platform::Seo), None, "2026-03-01T10:05:00Z");
    let records = Generation::list(&pool, 10, 0);

    let txt = export::render(Format::Text, &records);
    assert!(txt.contains("Headline: Fresh Organic Beans"));
    assert!(txt.contains("SEO Title: "));

    let csv = export::render(Format::Csv, &records);
    // header + 4 google fields + 4 seo fields
    assert_eq!(csv.trim_end().split("\r\n").count(), 9);
    assert!(csv.contains(",google_ads,api,Bean There,coffee roaster,"));

    let json: serde_json::Value =
        serde_json::from_str(&export::render(Format::Json, &records)).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[1]["source"], "fallback");
}
