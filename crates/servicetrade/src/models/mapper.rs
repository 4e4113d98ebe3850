//! Response normalization.
//!
//! ServiceTrade wraps resources in inconsistent envelopes and uses camelCase
//! keys. The functions here turn a decoded body into typed records or a
//! [`Page`] of them.

use serde_json::{Map, Value};

use crate::api::{Error, Result};

use super::{Attributes, Page, Resource};

/// Convert a camelCase (or PascalCase) key to snake_case.
///
/// Acronym runs split before their last capital, so `HTTPServer` becomes
/// `http_server` and `userID` becomes `user_id`. Dashes become underscores.
pub fn camel_to_snake(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
                let boundary = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower);
                if boundary && !out.ends_with('_') {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Snake-case the top-level keys of a record. Nested values are kept verbatim.
pub fn normalize_keys(raw: &Map<String, Value>) -> Map<String, Value> {
    raw.iter()
        .map(|(key, value)| (camel_to_snake(key), value.clone()))
        .collect()
}

/// Build a typed record from one raw API object.
pub fn build_record<T: Resource>(raw: Value) -> Result<T> {
    let map = match raw {
        Value::Object(map) => map,
        other => {
            return Err(Error::InvalidResponse(format!(
                "expected a {} object, got {}",
                T::OBJECT_NAME,
                other
            )))
        }
    };

    let normalized = normalize_keys(&map);
    let mut record: T = serde_json::from_value(Value::Object(normalized)).map_err(|e| {
        Error::InvalidResponse(format!("failed to parse {}: {}", T::OBJECT_NAME, e))
    })?;
    record.set_attributes(Attributes::from(map));
    Ok(record)
}

/// Single-record envelope: `data` when present, otherwise the body itself.
pub fn extract_record(mut body: Value) -> Value {
    let has_data = body.get("data").map(|d| !d.is_null()).unwrap_or(false);
    if has_data {
        body["data"].take()
    } else {
        body
    }
}

pub fn into_resource<T: Resource>(body: Value) -> Result<T> {
    build_record(extract_record(body))
}

/// Map a list response into a page of typed records.
pub fn into_page<T: Resource>(mut body: Value) -> Result<Page<T>> {
    let total = page_meta(&body, "total");
    let page = page_meta(&body, "page");
    let per_page = page_meta(&body, "per_page");

    let items = take_items(&mut body, T::LIST_KEY)
        .into_iter()
        .map(build_record::<T>)
        .collect::<Result<Vec<_>>>()?;

    let count = items.len() as u64;
    Ok(Page {
        items,
        total_count: total.unwrap_or(count),
        page: page.unwrap_or(1),
        per_page: per_page.unwrap_or(count),
    })
}

/// Item list precedence: `data.<list_key>`, then `data` as a list, then a bare list body.
pub fn take_items(body: &mut Value, list_key: &str) -> Vec<Value> {
    if let Some(Value::Array(items)) = body.get_mut("data").and_then(|d| d.get_mut(list_key)) {
        return std::mem::take(items);
    }
    if let Some(Value::Array(items)) = body.get_mut("data") {
        return std::mem::take(items);
    }
    if let Value::Array(items) = body {
        return std::mem::take(items);
    }
    Vec::new()
}

fn page_meta(body: &Value, key: &str) -> Option<u64> {
    body.get("data")
        .and_then(|d| d.get(key))
        .and_then(as_count)
        .or_else(|| body.get(key).and_then(as_count))
}

fn as_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}
