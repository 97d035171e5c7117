use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const DB_PATH: &str = "data/db/adcopy.db";

pub fn init_pool() -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file(DB_PATH);
    let pool = Pool::builder().max_size(10).build(manager)?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Key/value settings
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- One row per interpreted generation
        CREATE TABLE IF NOT EXISTS generations (
            id INTEGER PRIMARY KEY,
            business_name TEXT NOT NULL DEFAULT '',
            business_type TEXT NOT NULL,
            product TEXT NOT NULL,
            audience TEXT NOT NULL,
            offer TEXT NOT NULL DEFAULT '',
            tone TEXT NOT NULL,
            platform TEXT NOT NULL,
            source TEXT NOT NULL,
            fallback_reason TEXT,
            fields_json TEXT NOT NULL DEFAULT '{}',
            metrics_json TEXT NOT NULL DEFAULT '{}',
            keywords_json TEXT NOT NULL DEFAULT '[]',
            created_at DATETIME NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_generations_created ON generations(created_at);
        CREATE INDEX IF NOT EXISTS idx_generations_platform ON generations(platform);
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        // Providers
        ("ai_failover_chain", crate::ai::DEFAULT_CHAIN),
        ("ai_groq_enabled", "false"),
        ("ai_groq_api_key", ""),
        ("ai_groq_model", "llama-3.3-70b-versatile"),
        ("ai_openai_enabled", "false"),
        ("ai_openai_api_key", ""),
        ("ai_openai_model", "gpt-4o-mini"),
        ("ai_openai_base_url", ""),
        ("ai_gemini_enabled", "false"),
        ("ai_gemini_api_key", ""),
        ("ai_gemini_model", "gemini-1.5-flash"),
        ("ai_ollama_enabled", "false"),
        ("ai_ollama_url", "http://localhost:11434"),
        ("ai_ollama_model", ""),
        // Sampling
        ("ai_temperature", "0.8"),
        ("ai_max_tokens", "4000"),
        // Content
        ("default_tone", "Professional"),
        ("history_page_size", "20"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    Ok(())
}
