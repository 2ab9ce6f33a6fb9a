// Configuration: API keys and local paths.
//
// Keys resolve flag -> environment -> key file, field by field. The key file
// is a small JSON document written by `save-keys`. A .env file is loaded at
// startup via dotenvy, so its values arrive here as environment variables.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MissingKeys;

/// Default cache database location, relative to the working directory.
pub const DEFAULT_CACHE_DB: &str = ".cache/pipeline.db";

/// The three API keys, each optional. Also the on-disk key file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywordtool_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyapp_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appstorespy_key: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Keys {
    /// Field-wise fallback: keep our value where set, else take `other`'s.
    pub fn or(self, other: Keys) -> Keys {
        Keys {
            keywordtool_key: non_empty(self.keywordtool_key).or(non_empty(other.keywordtool_key)),
            keyapp_key: non_empty(self.keyapp_key).or(non_empty(other.keyapp_key)),
            appstorespy_key: non_empty(self.appstorespy_key).or(non_empty(other.appstorespy_key)),
        }
    }

    /// Keys from `KEYWORDTOOL_KEY`, `KEYAPP_KEY`, `APPSTORESPY_KEY`.
    pub fn from_env() -> Keys {
        Keys {
            keywordtool_key: non_empty(env::var("KEYWORDTOOL_KEY").ok()),
            keyapp_key: non_empty(env::var("KEYAPP_KEY").ok()),
            appstorespy_key: non_empty(env::var("APPSTORESPY_KEY").ok()),
        }
    }

    /// Names of the required keys (KeywordTool, Keyapp) that are unset.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.keywordtool_key.is_none() {
            missing.push("KEYWORDTOOL_KEY");
        }
        if self.keyapp_key.is_none() {
            missing.push("KEYAPP_KEY");
        }
        missing
    }
}

/// Read a key file. A missing file is empty; an unreadable or malformed
/// one is logged and treated as empty.
pub fn read_key_file(path: &Path) -> Keys {
    if !path.exists() {
        return Keys::default();
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|text| serde_json::from_str::<Keys>(&text).map_err(anyhow::Error::from));
    match parsed {
        Ok(keys) => keys,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable key file");
            Keys::default()
        }
    }
}

/// Write `keys` as pretty JSON, creating parent directories. KeywordTool
/// and Keyapp keys must both be present.
pub fn save_keys(path: &Path, keys: &Keys) -> Result<()> {
    let missing = keys.missing_required();
    if !missing.is_empty() {
        return Err(MissingKeys { missing }.into());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(keys)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// `<config dir>/keyword_pipeline/keys.json`, or `./keys.json` when the
/// platform has no config dir.
pub fn default_key_file() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("keyword_pipeline"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keys.json")
}

/// Show a secret without revealing it: the first four characters and an
/// ellipsis, `****` for short keys, `None` when unset.
pub fn mask(key: Option<&str>) -> String {
    match key {
        None | Some("") => "None".to_string(),
        Some(k) if k.chars().count() > 4 => {
            let head: String = k.chars().take(4).collect();
            format!("{head}…")
        }
        Some(_) => "****".to_string(),
    }
}

/// Central configuration loaded from the environment and key file.
#[derive(Debug, Clone)]
pub struct Config {
    pub keys: Keys,
    /// Where `save-keys` writes and `load` falls back to.
    pub key_file: PathBuf,
    pub cache_db: PathBuf,
}

impl Config {
    /// Environment first, then the key file (`KEYWORD_PIPELINE_CONFIG` or
    /// the default location).
    pub fn load() -> Self {
        let key_file = env::var("KEYWORD_PIPELINE_CONFIG")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_key_file);
        let cache_db = env::var("KEYWORD_PIPELINE_CACHE_DB")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DB));

        let keys = Keys::from_env().or(read_key_file(&key_file));
        Self {
            keys,
            key_file,
            cache_db,
        }
    }

    /// Command-line keys take precedence over everything loaded.
    pub fn with_overrides(mut self, flags: Keys) -> Self {
        self.keys = flags.or(self.keys);
        self
    }

    /// Check that the KeywordTool and Keyapp keys are configured.
    pub fn require_keys(&self) -> Result<()> {
        let missing = self.keys.missing_required();
        if !missing.is_empty() {
            return Err(MissingKeys { missing }.into());
        }
        Ok(())
    }

    /// Check that the KeywordTool key is configured.
    pub fn require_keywordtool(&self) -> Result<&str> {
        self.keys
            .keywordtool_key
            .as_deref()
            .ok_or_else(|| MissingKeys { missing: vec!["KEYWORDTOOL_KEY"] }.into())
    }

    /// Check that the Keyapp key is configured.
    pub fn require_keyapp(&self) -> Result<&str> {
        self.keys
            .keyapp_key
            .as_deref()
            .ok_or_else(|| MissingKeys { missing: vec!["KEYAPP_KEY"] }.into())
    }

    /// One-line masked summary of all three keys.
    pub fn masked_summary(&self) -> String {
        format!(
            "KEYWORDTOOL_KEY={}  KEYAPP_KEY={}  APPSTORESPY_KEY={}",
            mask(self.keys.keywordtool_key.as_deref()),
            mask(self.keys.keyapp_key.as_deref()),
            mask(self.keys.appstorespy_key.as_deref()),
        )
    }
}
