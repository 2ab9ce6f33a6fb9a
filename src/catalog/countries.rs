// Supported countries: KeywordTool language, Google Ads location id and a
// display title. Adding a country means one entry here plus a brand list in
// brands.rs.

use serde::Serialize;

/// Static per-country settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2, lowercase.
    pub code: &'static str,
    /// KeywordTool / Play language code.
    pub language: &'static str,
    /// Google Ads geo target id.
    pub location_id: u32,
    pub title: &'static str,
}

pub(super) const COUNTRIES: &[Country] = &[
    Country {
        code: "ar",
        language: "es",
        location_id: 2032,
        title: "Argentina",
    },
    Country {
        code: "br",
        language: "pt",
        location_id: 2076,
        title: "Brazil",
    },
    Country {
        code: "pl",
        language: "pl",
        location_id: 2616,
        title: "Poland",
    },
];
