use core_types::{Product, RankField};
use rust_decimal::Decimal;

/// The `n` products with the largest `field`, largest first.
///
/// Ties keep their input order. Asking for more products than exist is not
/// an error; the whole set comes back sorted.
pub fn top_n(records: &[Product], field: RankField, n: usize) -> Vec<Product> {
    let mut ranked = records.to_vec();
    // `sort_by` is stable, which gives first-seen-wins on ties.
    ranked.sort_by(|a, b| b.field(field).cmp(&a.field(field)));
    ranked.truncate(n);
    ranked
}

/// Products whose margin is strictly below `threshold`, in input order.
pub fn critical_products(records: &[Product], threshold: Decimal) -> Vec<Product> {
    records
        .iter()
        .filter(|p| p.margin_pct < threshold)
        .cloned()
        .collect()
}
