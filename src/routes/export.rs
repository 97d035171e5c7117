use chrono::Utc;
use rocket::http::{ContentType, Header, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{Request, State};
use serde_json::{json, Value};

use crate::db::DbPool;
use crate::export::{self, Format};
use crate::models::generation::Generation;

/// Rendered export served as a file attachment.
pub struct Download {
    format: Format,
    body: String,
}

impl<'r> Responder<'r, 'static> for Download {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let content_type =
            ContentType::parse_flexible(self.format.mime()).unwrap_or(ContentType::Plain);
        let file_name = export::file_name(self.format, Utc::now());
        let mut resp = (content_type, self.body).respond_to(req)?;
        resp.set_header(Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name),
        ));
        Ok(resp)
    }
}

type ExportResult = Result<Download, (Status, Json<Value>)>;

fn failure(status: Status, error: &str) -> (Status, Json<Value>) {
    (status, Json(json!({"ok": false, "error": error})))
}

fn parse_format(format: &str) -> Result<Format, (Status, Json<Value>)> {
    Format::from_str(format).ok_or_else(|| {
        failure(
            Status::BadRequest,
            "Unsupported export format (use txt, json or csv)",
        )
    })
}

/// `"3, 1,x,2"` → `[3, 1, 2]`
fn parse_ids(ids: &str) -> Vec<i64> {
    ids.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

fn download(format: Format, records: Vec<Generation>) -> ExportResult {
    if records.is_empty() {
        return Err(failure(Status::NotFound, "No content to export"));
    }
    log::info!(
        "[export] {} generations as {}",
        records.len(),
        format.extension()
    );
    Ok(Download {
        format,
        body: export::render(format, &records),
    })
}

#[get("/export/<format>?<ids>")]
pub fn export_many(pool: &State<DbPool>, format: &str, ids: Option<&str>) -> ExportResult {
    let format = parse_format(format)?;
    let records = match ids {
        Some(ids) => Generation::find_many(pool, &parse_ids(ids)),
        None => Generation::list(pool, Generation::count(pool), 0),
    };
    download(format, records)
}

#[get("/export/<id>/<format>")]
pub fn export_one(pool: &State<DbPool>, id: i64, format: &str) -> ExportResult {
    let format = parse_format(format)?;
    match Generation::find_by_id(pool, id) {
        Some(record) => download(format, vec![record]),
        None => Err(failure(Status::NotFound, "Generation not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_ids;

    #[test]
    fn ids_skip_garbage() {
        assert_eq!(parse_ids("3, 1,x,2"), vec![3, 1, 2]);
        assert!(parse_ids("").is_empty());
    }
}
