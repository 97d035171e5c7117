#[macro_use]
extern crate rocket;

use rocket::serde::json::Json;
use rocket::Request;
use serde_json::{json, Value};

mod ai;
mod boot;
mod content;
mod db;
mod export;
mod models;
mod routes;
mod tests;

#[catch(404)]
fn not_found(req: &Request) -> Json<Value> {
    Json(json!({"ok": false, "error": format!("No route for {}", req.uri())}))
}

#[catch(422)]
fn unprocessable() -> Json<Value> {
    Json(json!({"ok": false, "error": "Request body is missing fields or is not valid JSON"}))
}

#[catch(500)]
fn server_error() -> Json<Value> {
    Json(json!({"ok": false, "error": "Internal server error"}))
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check: create data directories before the pool opens the file
    boot::run();

    let pool = match db::init_pool() {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to initialize database pool: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = db::run_migrations(&pool) {
        log::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = db::seed_defaults(&pool) {
        log::error!("Failed to seed default settings: {}", e);
        std::process::exit(1);
    }

    log::info!("Database ready at {}", db::DB_PATH);

    rocket::build()
        .manage(pool)
        .mount("/api", routes::routes())
        .register("/", catchers![not_found, unprocessable, server_error])
}
