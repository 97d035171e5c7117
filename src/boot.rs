use log::{error, info};
use std::fs;
use std::path::Path;
use std::process;

/// Directories created if missing
const REQUIRED_DIRS: &[&str] = &["data", "data/db"];

/// Run all boot checks. Call this before the database pool is opened.
/// Aborts when the database directory cannot be created or written.
pub fn run() {
    info!("adcopy boot check starting...");

    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Database directory writable ──────────────────
    let db_dir = Path::new("data/db");
    if db_dir.exists() {
        let test_file = db_dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Database directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // ── 3. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        info!("  Rocket.toml not found, using defaults and ROCKET_* environment");
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!("Boot check FAILED: {} error(s). Aborting.", errors);
        process::exit(1);
    }

    info!("Boot check passed.");
}
