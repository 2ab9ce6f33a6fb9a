// Pipeline stages.
//
// fetch  -> `<cc>_results.csv`            (KeywordTool volumes per canonical brand)
// audit  -> `niche_competitors_keyapp.csv` (Play competitor + Keyapp usage)
// rank   -> `<cc>_competitors_*.csv`       (merge, cap, filter, sort)
// run    -> all three in order.

pub mod audit;
pub mod fetch;
pub mod rank;
pub mod run;
