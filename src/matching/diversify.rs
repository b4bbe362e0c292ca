//! Per-company diversification of a ranked list.

use std::collections::HashMap;

/// Keep at most `max_per_company` items per company, scanning in ranked
/// order. Excess items are dropped; kept items never move.
///
/// An empty company name is its own group. A cap of 0 disables the limit.
pub fn diversify_by_company<T>(
    ranked: Vec<T>,
    max_per_company: usize,
    company_of: impl Fn(&T) -> &str,
) -> Vec<T> {
    if max_per_company == 0 {
        return ranked;
    }
    let mut seen: HashMap<String, usize> = HashMap::new();
    ranked
        .into_iter()
        .filter(|item| {
            let count = seen
                .entry(company_of(item).trim().to_lowercase())
                .or_insert(0);
            *count += 1;
            *count <= max_per_company
        })
        .collect()
}
