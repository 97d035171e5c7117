use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::{ContentResult, GenerationRequest, Platform};
use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Generation {
    pub id: i64,
    pub business_name: String,
    pub business_type: String,
    pub product: String,
    pub audience: String,
    pub offer: String,
    pub tone: String,
    pub platform: String,
    pub source: String,
    pub fallback_reason: Option<String>,
    pub fields: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, f64>,
    pub keywords: Vec<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Default, PartialEq)]
pub struct GenerationStats {
    pub total: i64,
    pub platforms_used: i64,
    pub most_common_tone: Option<String>,
    pub generated_today: i64,
    pub api_count: i64,
    pub fallback_count: i64,
}

impl Generation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let fields_json: String = row.get("fields_json")?;
        let metrics_json: String = row.get("metrics_json")?;
        let keywords_json: String = row.get("keywords_json")?;
        Ok(Generation {
            id: row.get("id")?,
            business_name: row.get("business_name")?,
            business_type: row.get("business_type")?,
            product: row.get("product")?,
            audience: row.get("audience")?,
            offer: row.get("offer")?,
            tone: row.get("tone")?,
            platform: row.get("platform")?,
            source: row.get("source")?,
            fallback_reason: row.get("fallback_reason")?,
            fields: serde_json::from_str(&fields_json).unwrap_or_default(),
            metrics: serde_json::from_str(&metrics_json).unwrap_or_default(),
            keywords: serde_json::from_str(&keywords_json).unwrap_or_default(),
            created_at: row.get("created_at")?,
        })
    }

    /// Append one interpreted result with the request that produced it.
    pub fn create(
        pool: &DbPool,
        request: &GenerationRequest,
        result: &ContentResult,
        keywords: &[String],
    ) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let fields_json = serde_json::to_string(&result.fields).map_err(|e| e.to_string())?;
        let metrics_json = serde_json::to_string(&result.metrics).map_err(|e| e.to_string())?;
        let keywords_json = serde_json::to_string(keywords).map_err(|e| e.to_string())?;

        conn.execute(
            "INSERT INTO generations
             (business_name, business_type, product, audience, offer, tone, platform,
              source, fallback_reason, fields_json, metrics_json, keywords_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                request.business_name.trim(),
                request.business_type.trim(),
                request.product.trim(),
                request.audience.trim(),
                request.offer.trim(),
                request.tone().name(),
                result.platform.id(),
                result.source.as_str(),
                result.fallback_reason.map(|r| r.as_str()),
                fields_json,
                metrics_json,
                keywords_json,
                result.generated_at.naive_utc(),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM generations WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    /// Records with the given ids, in insertion order. Unknown ids are skipped.
    pub fn find_many(pool: &DbPool, ids: &[i64]) -> Vec<Self> {
        let mut found: Vec<Self> = ids
            .iter()
            .filter_map(|id| Self::find_by_id(pool, *id))
            .collect();
        found.sort_by_key(|g| g.id);
        found.dedup_by_key(|g| g.id);
        found
    }

    /// Insertion order, oldest first.
    pub fn list(pool: &DbPool, limit: i64, offset: i64) -> Vec<Self> {
        Self::query_page(
            pool,
            "SELECT * FROM generations ORDER BY id ASC LIMIT ?1 OFFSET ?2",
            limit,
            offset,
        )
    }

    /// Newest first, for the history view.
    pub fn recent(pool: &DbPool, limit: i64, offset: i64) -> Vec<Self> {
        Self::query_page(
            pool,
            "SELECT * FROM generations ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            limit,
            offset,
        )
    }

    fn query_page(pool: &DbPool, sql: &str, limit: i64, offset: i64) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let mut stmt = match conn.prepare(sql) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        stmt.query_map(params![limit, offset], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM generations", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn clear_all(pool: &DbPool) -> Result<usize, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM generations", [])
            .map_err(|e| e.to_string())
    }

    /// Dashboard figures. `today` is passed in so callers decide the clock.
    pub fn stats(pool: &DbPool, today: NaiveDate) -> GenerationStats {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return GenerationStats::default(),
        };

        let count = |sql: &str| -> i64 { conn.query_row(sql, [], |row| row.get(0)).unwrap_or(0) };

        let most_common_tone: Option<String> = conn
            .query_row(
                "SELECT tone FROM generations GROUP BY tone
                 ORDER BY COUNT(*) DESC, MIN(id) ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .ok();

        let generated_today: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM generations WHERE date(created_at) = ?1",
                params![today.format("%Y-%m-%d").to_string()],
                |row| row.get(0),
            )
            .unwrap_or(0);

        GenerationStats {
            total: count("SELECT COUNT(*) FROM generations"),
            platforms_used: count("SELECT COUNT(DISTINCT platform) FROM generations"),
            most_common_tone,
            generated_today,
            api_count: count("SELECT COUNT(*) FROM generations WHERE source = 'api'"),
            fallback_count: count("SELECT COUNT(*) FROM generations WHERE source = 'fallback'"),
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        Platform::from_str(&self.platform)
    }

    /// Fields in their shape's declared order; unknown platforms keep map order.
    pub fn ordered_fields(&self) -> Vec<(&str, &str)> {
        match self.platform() {
            Some(p) => p
                .shape()
                .fields
                .iter()
                .map(|spec| {
                    (
                        spec.name,
                        self.fields.get(spec.name).map(|s| s.as_str()).unwrap_or(""),
                    )
                })
                .collect(),
            None => self
                .fields
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        }
    }
}
