// Unit tests for configuration and run-level option handling: key
// precedence, masking, the key file, caps parsing and output naming.

use std::path::{Path, PathBuf};

use keyword_pipeline::config::{mask, read_key_file, save_keys, Config, Keys};
use keyword_pipeline::error::MissingKeys;
use keyword_pipeline::pipeline::run::{filter_nonused, output_name, parse_caps};

fn keys(kt: Option<&str>, ka: Option<&str>, aspy: Option<&str>) -> Keys {
    Keys {
        keywordtool_key: kt.map(String::from),
        keyapp_key: ka.map(String::from),
        appstorespy_key: aspy.map(String::from),
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("keyword-pipeline-test-{}", std::process::id()))
        .join(name)
}

// ============================================================
// Masking
// ============================================================

#[test]
fn mask_shows_first_four_chars() {
    assert_eq!(mask(Some("abcdefgh")), "abcd…");
}

#[test]
fn mask_hides_short_keys_entirely() {
    assert_eq!(mask(Some("abcd")), "****");
    assert_eq!(mask(Some("ab")), "****");
}

#[test]
fn mask_reports_missing() {
    assert_eq!(mask(None), "None");
    assert_eq!(mask(Some("")), "None");
}

// ============================================================
// Key precedence
// ============================================================

#[test]
fn flags_beat_env_beat_file() {
    let flags = keys(Some("flag-kt"), None, None);
    let env = keys(Some("env-kt"), Some("env-ka"), None);
    let file = keys(Some("file-kt"), Some("file-ka"), Some("file-aspy"));

    let resolved = flags.or(env).or(file);
    assert_eq!(resolved, keys(Some("flag-kt"), Some("env-ka"), Some("file-aspy")));
}

#[test]
fn blank_values_fall_through() {
    let resolved = keys(Some("  "), Some(""), None).or(keys(Some("kt"), Some("ka"), None));
    assert_eq!(resolved, keys(Some("kt"), Some("ka"), None));
}

#[test]
fn with_overrides_applies_flags_on_top() {
    let config = Config {
        keys: keys(Some("env-kt"), Some("env-ka"), None),
        key_file: PathBuf::from("keys.json"),
        cache_db: PathBuf::from(".cache/pipeline.db"),
    }
    .with_overrides(keys(None, Some("flag-ka"), Some("flag-aspy")));

    assert_eq!(config.keys, keys(Some("env-kt"), Some("flag-ka"), Some("flag-aspy")));
    assert!(config.require_keys().is_ok());
    assert_eq!(
        config.masked_summary(),
        "KEYWORDTOOL_KEY=env-…  KEYAPP_KEY=flag…  APPSTORESPY_KEY=flag…"
    );
}

#[test]
fn missing_required_keys_are_named() {
    let config = Config {
        keys: keys(None, None, Some("aspy")),
        key_file: PathBuf::from("keys.json"),
        cache_db: PathBuf::from("cache.db"),
    };
    let err = config.require_keys().unwrap_err();
    let missing = err.downcast_ref::<MissingKeys>().unwrap();
    assert_eq!(missing.missing, vec!["KEYWORDTOOL_KEY", "KEYAPP_KEY"]);
    assert!(config.require_keyapp().is_err());
}

// ============================================================
// Key file
// ============================================================

#[test]
fn save_and_read_key_file() {
    let path = temp_path("save/keys.json");
    let _ = std::fs::remove_file(&path);

    save_keys(&path, &keys(Some("kt-123456"), Some("ka-123456"), None)).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"keywordtool_key\""));
    assert!(!text.contains("appstorespy_key"));

    assert_eq!(read_key_file(&path), keys(Some("kt-123456"), Some("ka-123456"), None));
}

#[test]
fn save_requires_both_required_keys() {
    let path = temp_path("incomplete/keys.json");
    let err = save_keys(&path, &keys(Some("kt"), None, Some("aspy"))).unwrap_err();
    assert!(err.is::<MissingKeys>());
    assert!(!path.exists());
}

#[test]
fn missing_or_malformed_key_file_reads_empty() {
    assert_eq!(read_key_file(Path::new("/definitely/not/here.json")), Keys::default());

    let path = temp_path("bad/keys.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{not json").unwrap();
    assert_eq!(read_key_file(&path), Keys::default());
}

// ============================================================
// Caps and output names
// ============================================================

#[test]
fn caps_parse_and_skip_bad_entries() {
    assert_eq!(parse_caps("1000, 5000,,abc,-3, 20000 "), vec![1000, 5000, 20000]);
    assert!(parse_caps("").is_empty());
}

#[test]
fn output_names_per_cap() {
    assert_eq!(output_name("BR", None, None, 0), PathBuf::from("br_competitors_all.csv"));
    assert_eq!(
        output_name("all", Some(5000), None, 2),
        PathBuf::from("all_competitors_cap5000.csv")
    );
}

#[test]
fn rank_out_overrides_name() {
    let out = Path::new("reports/final.csv");
    assert_eq!(output_name("br", None, Some(out), 0), PathBuf::from("reports/final.csv"));
    assert_eq!(output_name("br", Some(10), Some(out), 1), PathBuf::from("reports/final.csv"));
    assert_eq!(
        output_name("br", Some(10), Some(out), 3),
        PathBuf::from("reports/final_cap10.csv")
    );
}

#[test]
fn nonused_filter_defaults_on() {
    assert!(filter_nonused(false, false));
    assert!(!filter_nonused(true, false));
    assert!(filter_nonused(true, true));
}
