// Data models: the records that flow between pipeline stages and the CSV
// files that connect them.
//
// Field order here is the column order of the corresponding CSV.

use serde::{Deserialize, Serialize};

/// One keyword's KeywordTool metrics for a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRow {
    pub keyword: String,
    pub country: String,
    pub language: String,
    pub search_volume: Option<u64>,
    pub cpc: Option<f64>,
    pub competition: Option<f64>,
    /// Monthly trend values as a JSON array (`[1200,null,900]`).
    pub trend: String,
}

impl VolumeRow {
    /// Volume with missing treated as zero.
    pub fn volume_or_zero(&self) -> u64 {
        self.search_volume.unwrap_or(0)
    }
}

/// A store app that showed up when searching for a brand keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub app_id: String,
    pub title: String,
    pub url: String,
}

impl Candidate {
    pub fn new(app_id: &str, title: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            title: title.trim().to_string(),
            url: format!("https://play.google.com/store/apps/details?id={app_id}"),
        }
    }
}

/// What AppstoreSpy knows about an app. Unknown stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppMeta {
    pub daily_installs: Option<f64>,
    pub banned: Option<bool>,
}

/// A candidate after enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCandidate {
    pub candidate: Candidate,
    pub meta: AppMeta,
}

/// One audited brand keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRow {
    pub keyword: String,
    /// Competitor store URL, or `-` when the search came back empty.
    pub competitor: String,
    #[serde(with = "yes_no")]
    pub used: bool,
    /// Country code.
    pub country: String,
    pub installs_daily: Option<u64>,
    #[serde(with = "yes_no")]
    pub competitor_banned: bool,
    /// `Title::installs::banned; ...` summary of every candidate.
    pub candidates: String,
}

impl AuditRow {
    pub fn has_competitor(&self) -> bool {
        let c = self.competitor.trim();
        !c.is_empty() && c != "-"
    }
}

/// A row of the final ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub keyword: String,
    pub competitor: String,
    #[serde(with = "yes_no")]
    pub used: bool,
    pub country: String,
    pub search_volume: u64,
}

impl RankedRow {
    pub fn has_competitor(&self) -> bool {
        let c = self.competitor.trim();
        !c.is_empty() && c != "-"
    }
}

/// `yes`/`no` on disk. Reading also accepts `true`/`false`/`1`/`0`.
mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *value { "yes" } else { "no" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.trim().to_lowercase().as_str() {
            "yes" | "true" | "1" | "y" => Ok(true),
            "no" | "false" | "0" | "n" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected yes/no, got {other:?}"
            ))),
        }
    }
}
