use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::extract::parse_object;
use super::synth;
use super::{ContentResult, ContentShape, FallbackReason, FieldSpec, GenerationRequest, Source};

/// Turn a model reply (or its absence) into a result carrying exactly the
/// shape's fields. Never fails: any rejected reply falls back to synthesized copy.
pub fn interpret(
    raw_text: Option<&str>,
    shape: &ContentShape,
    request: &GenerationRequest,
) -> ContentResult {
    interpret_at(raw_text, shape, request, Utc::now())
}

pub fn interpret_at(
    raw_text: Option<&str>,
    shape: &ContentShape,
    request: &GenerationRequest,
    now: DateTime<Utc>,
) -> ContentResult {
    match extract_fields(raw_text, shape) {
        Ok(fields) => ContentResult {
            platform: shape.platform,
            fields,
            metrics: synth::metrics(shape, request),
            source: Source::Api,
            generated_at: now,
            fallback_reason: None,
        },
        Err(reason) => {
            match reason {
                FallbackReason::Unavailable => {
                    log::debug!("[interpret] no reply for {}, synthesizing", shape.platform)
                }
                _ => log::warn!(
                    "[interpret] rejected {} reply ({}), synthesizing",
                    shape.platform,
                    reason
                ),
            }
            synth::synthesize(shape, request, reason, now)
        }
    }
}

/// Validated field map from a reply, or the reason it was rejected.
pub fn extract_fields(
    raw_text: Option<&str>,
    shape: &ContentShape,
) -> Result<BTreeMap<String, String>, FallbackReason> {
    let raw = raw_text.ok_or(FallbackReason::Unavailable)?;
    let object = parse_object(raw)?;

    if let Some(fields) = collect_fields(&object, shape) {
        return Ok(fields);
    }

    // Multi-platform replies nest each platform's copy under its id.
    if let Some(Value::Object(nested)) = object.get(shape.platform.id()) {
        if let Some(fields) = collect_fields(nested, shape) {
            return Ok(fields);
        }
    }

    Err(FallbackReason::Incomplete)
}

fn collect_fields(object: &Map<String, Value>, shape: &ContentShape) -> Option<BTreeMap<String, String>> {
    shape
        .fields
        .iter()
        .map(|spec| lookup(object, spec).map(|v| (spec.name.to_string(), v)))
        .collect()
}

fn lookup(object: &Map<String, Value>, spec: &FieldSpec) -> Option<String> {
    if let Some(value) = object.get(spec.name) {
        return coerce(value);
    }
    spec.aliases
        .iter()
        .filter_map(|alias| object.get(*alias))
        .find_map(first_item)
}

/// Strings pass through; numbers and booleans become their text; scalar lists
/// are joined with ", ".
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(scalar)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(", ")),
        other => scalar(other),
    }
}

/// Alias keys are usually plural lists of candidates; the first one is the pick.
fn first_item(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.first().and_then(scalar),
        other => scalar(other),
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
