// Response flattening for KeywordTool.
//
// Accounts have been seen returning any of:
//   {"results": {"kw": {...}, ...}}
//   {"results": [ {...}, ... ]}
//   {"results": {"keywords": {"kw": {...}}}}
//   {"data": {...}} / {"keywords": {...}}
// Everything is normalised into `VolumeRow`s before aggregation.

use serde_json::{Map, Number, Value};

use crate::models::VolumeRow;

/// Keys that mark a map entry as a keyword record rather than metadata
/// such as `status`.
const RECORD_MARKERS: &[&str] = &["volume", "search_volume", "m1", "string"];

/// The block holding per-keyword metrics: the first non-empty of
/// `results`, `data`, `keywords`.
pub fn results_block(data: &Value) -> Option<&Value> {
    ["results", "data", "keywords"]
        .iter()
        .filter_map(|k| data.get(k))
        .find(|v| is_truthy(v))
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Object(m) => !m.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
    }
}

/// Parse a number that may arrive as a JSON number or a numeric string.
/// Integers stay integers.
pub fn coerce_num(v: &Value) -> Option<Number> {
    match v {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(Number::from(i))
            } else {
                s.parse::<f64>().ok().and_then(Number::from_f64)
            }
        }
        _ => None,
    }
}

fn coerce_f64(v: Option<&Value>) -> Option<f64> {
    v.and_then(coerce_num).and_then(|n| n.as_f64())
}

/// Volume as a whole count. Negative or non-finite values are dropped.
fn coerce_volume(v: Option<&Value>) -> Option<u64> {
    let n = v.and_then(coerce_num)?;
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

/// Collect keyword records from whichever response shape came back.
fn records(data: &Value) -> Vec<Map<String, Value>> {
    let Some(block) = results_block(data) else {
        return Vec::new();
    };

    match block {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        Value::Object(map) if map.contains_key("keywords") => map
            .get("keywords")
            .and_then(Value::as_object)
            .map(|kws| {
                kws.iter()
                    .map(|(kw, metrics)| {
                        let mut m = Map::new();
                        m.insert("string".into(), Value::String(kw.clone()));
                        if let Some(obj) = metrics.as_object() {
                            m.extend(obj.clone());
                        }
                        m
                    })
                    .collect()
            })
            .unwrap_or_default(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(kw, metrics)| {
                let obj = metrics.as_object()?;
                if !RECORD_MARKERS.iter().any(|k| obj.contains_key(*k)) {
                    return None;
                }
                let mut m = Map::new();
                m.insert(
                    "string".into(),
                    obj.get("string")
                        .cloned()
                        .unwrap_or_else(|| Value::String(kw.clone())),
                );
                m.extend(obj.clone());
                Some(m)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Monthly trend: `m1..m12` when any is present, else a scalar `trend`.
fn trend(record: &Map<String, Value>) -> Vec<Value> {
    let months: Vec<Value> = (1..=12)
        .filter_map(|i| record.get(&format!("m{i}")))
        .map(|v| coerce_num(v).map(Value::Number).unwrap_or(Value::Null))
        .collect();
    if !months.is_empty() {
        return months;
    }
    match record.get("trend") {
        None | Some(Value::Null) => Vec::new(),
        Some(v) => vec![coerce_num(v).map(Value::Number).unwrap_or(Value::Null)],
    }
}

/// Normalise a KeywordTool response into rows for one country.
pub fn flatten_results(data: &Value, country: &str, language: &str) -> Vec<VolumeRow> {
    records(data)
        .into_iter()
        .map(|r| {
            let keyword = match r.get("string") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            let volume = r.get("search_volume").or_else(|| r.get("volume"));
            let competition = r.get("competition").or_else(|| r.get("cmp"));

            VolumeRow {
                keyword,
                country: country.to_string(),
                language: language.to_string(),
                search_volume: coerce_volume(volume),
                cpc: coerce_f64(r.get("cpc")),
                competition: coerce_f64(competition),
                trend: Value::Array(trend(&r)).to_string(),
            }
        })
        .collect()
}
