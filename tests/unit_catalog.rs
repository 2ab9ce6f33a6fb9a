// Unit tests for the country and brand catalog.
//
// Covers country lookup, canonical lists, variant generation and the
// reverse index that maps KeywordTool spellings back onto brands.

use keyword_pipeline::catalog::normalize::normalize_text;
use keyword_pipeline::catalog::{self, CountrySelector};

// ============================================================
// Countries
// ============================================================

#[test]
fn supported_countries_are_sorted() {
    assert_eq!(catalog::supported_countries(), vec!["ar", "br", "pl"]);
}

#[test]
fn country_lookup_is_case_insensitive() {
    let br = catalog::country(" BR ").unwrap();
    assert_eq!(br.code, "br");
    assert_eq!(br.language, "pt");
    assert_eq!(br.location_id, 2076);
    assert_eq!(br.title, "Brazil");
}

#[test]
fn unknown_country_lists_supported_codes() {
    let err = catalog::country("de").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("de"), "got: {msg}");
    assert!(msg.contains("ar, br, pl"), "got: {msg}");
}

#[test]
fn selector_parses_all_and_codes() {
    assert_eq!("ALL".parse::<CountrySelector>().unwrap(), CountrySelector::All);
    let pl: CountrySelector = "pl".parse().unwrap();
    assert_eq!(pl.label(), "pl");
    assert_eq!(pl.countries().len(), 1);
    assert!("xx".parse::<CountrySelector>().is_err());
}

#[test]
fn selector_all_expands_in_code_order() {
    let codes: Vec<&str> = CountrySelector::All.countries().iter().map(|c| c.code).collect();
    assert_eq!(codes, vec!["ar", "br", "pl"]);
}

#[test]
fn selector_defaults_to_brazil() {
    assert_eq!(CountrySelector::default().label(), "br");
}

// ============================================================
// Canonical lists and variants
// ============================================================

#[test]
fn canonical_list_is_case_insensitively_unique() {
    for code in catalog::supported_countries() {
        let list = catalog::canonical_list(code).unwrap();
        let mut seen = std::collections::HashSet::new();
        for brand in list {
            assert!(seen.insert(brand.to_lowercase()), "{code}: duplicate {brand}");
        }
    }
}

#[test]
fn canonical_list_keeps_catalog_order() {
    let br = catalog::canonical_list("br").unwrap();
    assert_eq!(br[0], "Betano");
    assert_eq!(br[1], "bet365");
}

#[test]
fn variants_include_lowercase_and_glued_forms() {
    let map = catalog::variants_map("br").unwrap();
    let (_, galera) = map.iter().find(|(c, _)| c == "Galera.bet").unwrap();
    assert!(galera.contains(&"Galera.bet".to_string()));
    // The lowercase form collapses into the canonical spelling.
    assert!(!galera.contains(&"galera.bet".to_string()));
    assert_eq!(galera.iter().filter(|v| v.eq_ignore_ascii_case("galera.bet")).count(), 1);
    assert!(galera.contains(&"galerabet".to_string()));
    assert!(galera.iter().any(|v| v == "GaleraBet"));
}

#[test]
fn all_variants_are_sorted_and_unique() {
    let all = catalog::all_variants("pl").unwrap();
    let mut sorted = all.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(all, sorted);
}

// ============================================================
// Canonicalisation
// ============================================================

#[test]
fn canonicalize_maps_aliases_and_glued_spellings() {
    assert_eq!(catalog::canonicalize("br", "galerabet").unwrap(), Some("Galera.bet"));
    assert_eq!(catalog::canonicalize("pl", "GO BET").unwrap(), Some("GO+bet"));
    assert_eq!(catalog::canonicalize("br", "Esporte 365").unwrap(), Some("Esportes da Sorte"));
    assert_eq!(catalog::canonicalize("pl", "totalcasino").unwrap(), Some("Total Casino"));
}

#[test]
fn aliases_of_brands_outside_the_country_list_are_not_indexed() {
    // GO+bet has BR aliases but is only a canonical brand in PL.
    assert_eq!(catalog::canonicalize("br", "GO BET").unwrap(), None);
}

#[test]
fn canonicalize_ignores_diacritics() {
    assert_eq!(catalog::canonicalize("ar", "jugadon").unwrap(), Some("Jugadón"));
}

#[test]
fn canonicalize_unknown_spelling_is_none() {
    assert_eq!(catalog::canonicalize("br", "definitely not a brand").unwrap(), None);
}

#[test]
fn canonicalize_unknown_country_is_an_error() {
    assert!(catalog::canonicalize("zz", "Betano").is_err());
}

#[test]
fn canonical_key_falls_back_to_normalised_text() {
    assert_eq!(catalog::canonical_key(Some("br"), "kto"), "KTO");
    assert_eq!(catalog::canonical_key(Some("br"), "Some Other App!"), "someotherapp");
    assert_eq!(catalog::canonical_key(None, "Betano"), normalize_text("Betano"));
    assert_eq!(catalog::canonical_key(Some("zz"), "Betano"), "betano");
}
