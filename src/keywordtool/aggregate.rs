// Fold variant rows back onto canonical brands.

use std::collections::HashMap;

use crate::catalog;
use crate::models::VolumeRow;

/// One row per canonical brand, keeping the metrics of the variant with
/// the highest volume (first one wins ties; missing volume counts as 0).
///
/// Rows whose keyword doesn't map to a canonical brand are dropped, as are
/// all rows for a country the catalog doesn't know. Output order is the
/// order in which each canonical brand was first seen.
pub fn aggregate_to_canonical(rows: &[VolumeRow], country: &str) -> Vec<VolumeRow> {
    let mut order: Vec<&'static str> = Vec::new();
    let mut best: HashMap<&'static str, VolumeRow> = HashMap::new();

    for row in rows {
        let Ok(Some(canon)) = catalog::canonicalize(country, &row.keyword) else {
            continue;
        };

        match best.get_mut(canon) {
            None => {
                order.push(canon);
                best.insert(
                    canon,
                    VolumeRow {
                        keyword: canon.to_string(),
                        country: country.to_string(),
                        search_volume: Some(row.volume_or_zero()),
                        ..row.clone()
                    },
                );
            }
            Some(current) => {
                if row.volume_or_zero() > current.volume_or_zero() {
                    current.search_volume = row.search_volume;
                    current.cpc = row.cpc;
                    current.competition = row.competition;
                    current.trend = row.trend.clone();
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|canon| best.remove(canon))
        .collect()
}
