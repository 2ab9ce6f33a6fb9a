// Country and brand catalog: the single source of truth for which
// countries are supported and which brand keywords belong to each.
//
// Canonical lists are what ends up in reports. Variants (lowercase, glued
// forms, aliases) are only sent to KeywordTool and used to map responses
// back onto canonical brands.

mod brands;
mod countries;
pub mod normalize;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

pub use countries::Country;

use crate::error::UnknownCountry;
use normalize::{normalize_text, uniq};

/// Pre-built lookup tables for one country.
struct CountryIndex {
    canonical: Vec<String>,
    /// canonical → variants, in canonical-list order.
    variants: Vec<(String, Vec<String>)>,
    /// normalised variant → canonical.
    reverse: HashMap<String, String>,
}

static INDEX: LazyLock<HashMap<&'static str, CountryIndex>> = LazyLock::new(|| {
    countries::COUNTRIES
        .iter()
        .map(|c| (c.code, build_index(c.code)))
        .collect()
});

fn build_index(code: &str) -> CountryIndex {
    let canonical = uniq(brands::canonical_raw(code).iter().copied());
    let aliases: HashMap<&str, &[&str]> = brands::extra_aliases(code).iter().copied().collect();

    let variants: Vec<(String, Vec<String>)> = canonical
        .iter()
        .map(|canon| {
            let mut vs = base_variants(canon);
            if let Some(extra) = aliases.get(canon.as_str()) {
                vs.extend(extra.iter().map(|s| s.to_string()));
            }
            (canon.clone(), uniq(vs))
        })
        .collect();

    let mut reverse = HashMap::new();
    for (canon, vs) in &variants {
        for v in vs {
            reverse.insert(normalize_text(v), canon.clone());
        }
    }

    CountryIndex {
        canonical,
        variants,
        reverse,
    }
}

/// Canonical spelling, its lowercase form and the glued normalised form
/// (when it differs from the lowercase one).
fn base_variants(canon: &str) -> Vec<String> {
    let lower = canon.to_lowercase();
    let glued = normalize_text(canon);
    let mut out = vec![canon.to_string(), lower.clone()];
    if !glued.is_empty() && glued != lower {
        out.push(glued);
    }
    uniq(out)
}

fn index(code: &str) -> Result<&'static CountryIndex, UnknownCountry> {
    let code = code.trim().to_lowercase();
    INDEX.get(code.as_str()).ok_or_else(|| unknown(&code))
}

fn unknown(code: &str) -> UnknownCountry {
    UnknownCountry {
        code: code.to_string(),
        supported: supported_countries().join(", "),
    }
}

/// Supported country codes, sorted.
pub fn supported_countries() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = countries::COUNTRIES.iter().map(|c| c.code).collect();
    codes.sort_unstable();
    codes
}

/// Look up a country by code (case-insensitive).
pub fn country(code: &str) -> Result<&'static Country, UnknownCountry> {
    let wanted = code.trim().to_lowercase();
    countries::COUNTRIES
        .iter()
        .find(|c| c.code == wanted)
        .ok_or_else(|| unknown(&wanted))
}

/// Canonical brand list for a country, in catalog order.
pub fn canonical_list(code: &str) -> Result<&'static [String], UnknownCountry> {
    Ok(&index(code)?.canonical)
}

/// canonical → variants for a country.
pub fn variants_map(code: &str) -> Result<&'static [(String, Vec<String>)], UnknownCountry> {
    Ok(&index(code)?.variants)
}

/// Every distinct variant for a country, sorted so batches are reproducible.
pub fn all_variants(code: &str) -> Result<Vec<String>, UnknownCountry> {
    let set: BTreeSet<&str> = variants_map(code)?
        .iter()
        .flat_map(|(_, vs)| vs.iter().map(String::as_str))
        .collect();
    Ok(set.into_iter().map(str::to_string).collect())
}

/// Map an arbitrary spelling back onto its canonical brand.
pub fn canonicalize(code: &str, s: &str) -> Result<Option<&'static str>, UnknownCountry> {
    Ok(index(code)?
        .reverse
        .get(&normalize_text(s))
        .map(String::as_str))
}

/// Canonical brand when the country is known and the spelling maps;
/// otherwise the plain normalised text. Used as a join key.
pub fn canonical_key(code: Option<&str>, s: &str) -> String {
    code.and_then(|c| canonicalize(c, s).ok().flatten())
        .map(str::to_string)
        .unwrap_or_else(|| normalize_text(s))
}

/// Either every supported country or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountrySelector {
    All,
    One(&'static Country),
}

impl CountrySelector {
    /// The countries this selector covers, sorted by code.
    pub fn countries(&self) -> Vec<&'static Country> {
        match self {
            CountrySelector::All => supported_countries()
                .into_iter()
                .filter_map(|code| country(code).ok())
                .collect(),
            CountrySelector::One(c) => vec![*c],
        }
    }

    /// Lowercase label used in output file names (`br`, `all`).
    pub fn label(&self) -> &'static str {
        match self {
            CountrySelector::All => "all",
            CountrySelector::One(c) => c.code,
        }
    }
}

impl Default for CountrySelector {
    /// Brazil when the catalog has it, otherwise the first supported code.
    fn default() -> Self {
        country("br")
            .ok()
            .or_else(|| supported_countries().first().and_then(|c| country(c).ok()))
            .map(CountrySelector::One)
            .unwrap_or(CountrySelector::All)
    }
}

impl FromStr for CountrySelector {
    type Err = UnknownCountry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CountrySelector::All);
        }
        country(s).map(CountrySelector::One)
    }
}

impl fmt::Display for CountrySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
