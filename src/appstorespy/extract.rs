// Field extraction from AppstoreSpy responses.
//
// The API's field naming varies by endpoint and plan, so each extractor
// walks a list of known locations and takes the first usable value.

use serde_json::Value;

/// Paths that may hold a single installs/day figure, in preference order.
const DAILY_PATHS: &[&[&str]] = &[
    &["installs_daily"],
    &["daily_installs"],
    &["est_installs_per_day"],
    &["installs_per_day"],
    &["metrics", "daily_installs"],
    &["summary", "daily_installs"],
    &["downloads", "daily"],
];

/// Keys that may hold a daily installs series (trends endpoint).
const SERIES_KEYS: &[&str] = &[
    "daily_installs",
    "installs_daily",
    "downloads_daily",
    "installs_per_day",
];

/// Boolean flags that mean the app is gone when true.
const BANNED_FLAGS: &[&str] = &[
    "is_banned",
    "banned",
    "removed",
    "suspended",
    "unpublished",
    "deleted",
];

/// Substrings of `status` that mean the app is gone.
const BANNED_STATUSES: &[&str] = &[
    "banned",
    "removed",
    "suspended",
    "unpublished",
    "deleted",
    "not available",
    "terminated",
];

/// Nested objects that may carry the same flags.
const NESTED: &[&str] = &["summary", "metrics", "app", "details"];

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn at_path<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(data, |node, key| node.get(key))
}

/// The first non-null installs/day value found. A list resolves to its
/// last element.
pub fn daily_installs(data: &Value) -> Option<f64> {
    DAILY_PATHS.iter().find_map(|path| {
        let node = at_path(data, path)?;
        match node {
            Value::Null => None,
            Value::Array(items) => items.last().and_then(as_f64),
            other => as_f64(other),
        }
    })
}

/// The first installs series found. Points may be bare numbers or objects
/// with `value`/`v`/`count`; unparsable points are skipped.
pub fn daily_series(data: &Value) -> Vec<f64> {
    SERIES_KEYS
        .iter()
        .find_map(|k| data.get(*k))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|point| match point {
                    Value::Object(obj) => ["value", "v", "count"]
                        .iter()
                        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
                        .and_then(as_f64),
                    other => as_f64(other),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `Some(true)` when the app looks removed, `Some(false)` when it is
/// explicitly published/available, `None` when nothing says either way.
pub fn banned_flag(data: &Value) -> Option<bool> {
    let Value::Object(map) = data else {
        return None;
    };

    if BANNED_FLAGS
        .iter()
        .any(|k| matches!(map.get(*k), Some(Value::Bool(true))))
    {
        return Some(true);
    }

    let status = match map.get("status") {
        Some(Value::String(s)) => s.to_lowercase(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string().to_lowercase(),
    };
    if BANNED_STATUSES.iter().any(|s| status.contains(s)) {
        return Some(true);
    }

    for key in NESTED {
        if let Some(nested @ Value::Object(_)) = map.get(*key) {
            if let Some(flag) = banned_flag(nested) {
                return Some(flag);
            }
        }
    }

    ["is_published", "is_available"]
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_bool))
        .map(|published| !published)
}
