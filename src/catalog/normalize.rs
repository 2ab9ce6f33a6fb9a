// Text normalisation shared by the catalog, the volume merge and the
// Keyapp usage check.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("static regex"));

/// Lowercase, strip diacritics (NFKD + drop combining marks).
fn fold(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Lowercase, strip diacritics and keep only `a-z0-9`.
///
/// `"Jugadón"` → `"jugadon"`, `"GO+bet"` → `"gobet"`, `"BC.GAME"` → `"bcgame"`.
pub fn normalize_text(s: &str) -> String {
    fold(s)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Split into `[a-z0-9]+` runs after folding, keeping runs of 3+ characters.
pub fn tokens(s: &str) -> Vec<String> {
    let folded = fold(s);
    TOKEN_RE
        .find_iter(&folded)
        .map(|m| m.as_str().to_string())
        .filter(|t| t.len() >= 3)
        .collect()
}

/// De-duplicate case-insensitively, keeping the first spelling and order.
/// Blank entries are dropped and the rest trimmed.
pub fn uniq<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let trimmed = item.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            out.push(trimmed.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_accents_and_punctuation() {
        assert_eq!(normalize_text("  Jugadón "), "jugadon");
        assert_eq!(normalize_text("GO+bet"), "gobet");
        assert_eq!(normalize_text("Casino del Río Online"), "casinodelrioonline");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn tokens_drop_short_runs() {
        assert_eq!(tokens("LV BET"), vec!["bet"]);
        assert_eq!(tokens("Bet365 Casino"), vec!["bet365", "casino"]);
        assert!(tokens("PIN").len() == 1);
        assert!(tokens("a b").is_empty());
    }

    #[test]
    fn uniq_is_case_insensitive_and_stable() {
        let out = uniq(["Betano", "betano", " KTO ", "", "Bet365", "BET365"]);
        assert_eq!(out, vec!["Betano", "KTO", "Bet365"]);
    }
}
