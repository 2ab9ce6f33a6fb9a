// "Used" detection: does any of the operator's app titles already carry
// this brand?

use std::collections::HashSet;

use crate::catalog::normalize::tokens;

/// Whether `brand` appears in any of `titles`.
///
/// Both sides are tokenised into `[a-z0-9]` runs of 3+ characters. A title
/// matches when it contains any brand token of 4+ characters, or, for
/// multi-token brands, at least two of the brand's tokens. Single short
/// brands (`PIN`, `KTO`) never match; they collide with too many titles.
pub fn brand_used(brand: &str, titles: &[String]) -> bool {
    let brand_tokens = tokens(brand);
    if brand_tokens.is_empty() || (brand_tokens.len() == 1 && brand_tokens[0].len() < 4) {
        return false;
    }
    let brand_set: HashSet<&str> = brand_tokens.iter().map(String::as_str).collect();

    titles.iter().any(|title| {
        let title_tokens = tokens(title);
        if title_tokens.is_empty() {
            return false;
        }
        let title_set: HashSet<&str> = title_tokens.iter().map(String::as_str).collect();

        let long_hit = brand_tokens
            .iter()
            .any(|bt| bt.len() >= 4 && title_set.contains(bt.as_str()));
        if long_hit {
            return true;
        }

        brand_tokens.len() >= 2 && title_set.intersection(&brand_set).count() >= 2
    })
}
