// Unit tests for AppstoreSpy field extraction and endpoint merging.

use keyword_pipeline::appstorespy::client::merge_endpoint;
use keyword_pipeline::appstorespy::extract::{banned_flag, daily_installs, daily_series};
use keyword_pipeline::appstorespy::{InstallsSource, NoopInstalls};
use keyword_pipeline::models::AppMeta;
use serde_json::json;

// ============================================================
// daily_installs
// ============================================================

#[test]
fn daily_prefers_earlier_paths() {
    let data = json!({"daily_installs": 10, "installs_daily": 20});
    assert_eq!(daily_installs(&data), Some(20.0));
}

#[test]
fn daily_reads_nested_paths() {
    assert_eq!(daily_installs(&json!({"downloads": {"daily": "42"}})), Some(42.0));
    assert_eq!(daily_installs(&json!({"summary": {"daily_installs": 7.5}})), Some(7.5));
}

#[test]
fn daily_list_uses_last_element() {
    assert_eq!(daily_installs(&json!({"installs_per_day": [1, 2, 3]})), Some(3.0));
}

#[test]
fn daily_unknown_when_absent_or_garbage() {
    assert_eq!(daily_installs(&json!({})), None);
    assert_eq!(daily_installs(&json!({"installs_daily": "lots"})), None);
}

// ============================================================
// daily_series
// ============================================================

#[test]
fn series_accepts_numbers_and_objects() {
    let data = json!({"daily_installs": [5, {"value": 6}, {"v": "7"}, {"count": null}, "x", {"count": 8}]});
    assert_eq!(daily_series(&data), vec![5.0, 6.0, 7.0, 8.0]);
}

#[test]
fn series_empty_without_known_key() {
    assert!(daily_series(&json!({"points": [1, 2]})).is_empty());
}

// ============================================================
// banned_flag
// ============================================================

#[test]
fn banned_boolean_flags() {
    assert_eq!(banned_flag(&json!({"is_banned": true})), Some(true));
    assert_eq!(banned_flag(&json!({"removed": true})), Some(true));
    assert_eq!(banned_flag(&json!({"removed": false})), None);
}

#[test]
fn banned_from_status_string() {
    assert_eq!(banned_flag(&json!({"status": "Suspended by Google"})), Some(true));
    assert_eq!(banned_flag(&json!({"status": "terminated"})), Some(true));
}

#[test]
fn banned_from_nested_object() {
    assert_eq!(banned_flag(&json!({"app": {"deleted": true}})), Some(true));
    assert_eq!(banned_flag(&json!({"details": {"is_available": false}})), Some(true));
}

#[test]
fn published_means_not_banned() {
    assert_eq!(banned_flag(&json!({"is_published": true})), Some(false));
    assert_eq!(banned_flag(&json!({"is_available": false})), Some(true));
}

#[test]
fn banned_unknown_for_non_objects() {
    assert_eq!(banned_flag(&json!([1, 2])), None);
    assert_eq!(banned_flag(&json!(null)), None);
}

// ============================================================
// merge_endpoint
// ============================================================

#[test]
fn merge_fills_gaps_only() {
    let mut meta = AppMeta::default();
    merge_endpoint(&mut meta, &json!({"status": "live"}));
    assert_eq!(meta, AppMeta::default());

    merge_endpoint(&mut meta, &json!({"est_installs_per_day": 55}));
    assert_eq!(meta.daily_installs, Some(55.0));

    merge_endpoint(&mut meta, &json!({"installs_daily": 1, "is_published": true}));
    assert_eq!(meta.daily_installs, Some(55.0));
    assert_eq!(meta.banned, Some(false));
}

#[tokio::test]
async fn noop_source_is_disabled_and_empty() {
    let source = NoopInstalls;
    assert!(!source.is_enabled());
    assert_eq!(source.app_meta("com.example").await.unwrap(), AppMeta::default());
}
