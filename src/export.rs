use chrono::{DateTime, Utc};

use crate::models::generation::Generation;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Text,
    Json,
    Csv,
}

impl Format {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

const CSV_HEADER: &str =
    "id,created_at,platform,source,business_name,business_type,product,audience,tone,field,value";

pub fn render(format: Format, records: &[Generation]) -> String {
    match format {
        Format::Text => to_text(records),
        Format::Json => serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string()),
        Format::Csv => to_csv(records),
    }
}

/// `marketing_content_20260102_030405.csv`
pub fn file_name(format: Format, now: DateTime<Utc>) -> String {
    format!(
        "marketing_content_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// `meta_description` → `Meta Description`, `cta` → `CTA`.
pub fn label(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| match w {
            "cta" | "seo" | "ctr" => w.to_uppercase(),
            _ => {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn platform_label(record: &Generation) -> String {
    record
        .platform()
        .map(|p| p.label().to_string())
        .unwrap_or_else(|| record.platform.clone())
}

/// Rates are percentages; scores are plain numbers.
fn metric_unit(name: &str) -> &'static str {
    if name.ends_with("_ctr") || name.ends_with("_engagement") {
        "%"
    } else {
        ""
    }
}

fn to_text(records: &[Generation]) -> String {
    let mut txt = String::new();
    txt.push_str("AI Generated Marketing Content\n");
    txt.push_str("==============================\n");

    for record in records {
        txt.push('\n');
        txt.push_str(&format!(
            "#{} - {} ({}) - {}\n\n",
            record.id,
            platform_label(record),
            record.source,
            record.created_at.format("%Y-%m-%d %H:%M:%S")
        ));
        for (name, value) in [
            ("Business Name", &record.business_name),
            ("Business Type", &record.business_type),
            ("Product/Service", &record.product),
            ("Target Audience", &record.audience),
            ("Offer", &record.offer),
            ("Tone", &record.tone),
        ] {
            if !value.is_empty() {
                txt.push_str(&format!("{}: {}\n", name, value));
            }
        }
        txt.push('\n');
        for (name, value) in record.ordered_fields() {
            txt.push_str(&format!("{}: {}\n", label(name), value));
        }
        for (name, value) in &record.metrics {
            txt.push_str(&format!("{}: {:.1}{}\n", label(name), value, metric_unit(name)));
        }
        if !record.keywords.is_empty() {
            txt.push_str(&format!("Extracted Keywords: {}\n", record.keywords.join(", ")));
        }
        txt.push_str("\n------------------------------\n");
    }
    txt
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn to_csv(records: &[Generation]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");

    for record in records {
        let created = record.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let id = record.id.to_string();
        for (name, value) in record.ordered_fields() {
            let row = [
                id.as_str(),
                created.as_str(),
                record.platform.as_str(),
                record.source.as_str(),
                record.business_name.as_str(),
                record.business_type.as_str(),
                record.product.as_str(),
                record.audience.as_str(),
                record.tone.as_str(),
                name,
                value,
            ];
            let line: Vec<String> = row.iter().map(|v| csv_field(v)).collect();
            out.push_str(&line.join(","));
            out.push_str("\r\n");
        }
    }
    out
}
