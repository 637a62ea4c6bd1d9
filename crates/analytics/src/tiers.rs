use crate::error::AnalyticsError;
use crate::stats;
use core_types::{PriceTier, Product};
use rust_decimal::Decimal;
use serde::Serialize;

/// Edges of the three equal-frequency price bins.
///
/// Economic is `[min, lower]`, Medium is `(lower, upper]`, Premium is
/// `(upper, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierBoundaries {
    pub min: Decimal,
    pub lower: Decimal,
    pub upper: Decimal,
    pub max: Decimal,
}

impl TierBoundaries {
    pub fn tier_of(&self, price: Decimal) -> PriceTier {
        if price <= self.lower {
            PriceTier::Economic
        } else if price <= self.upper {
            PriceTier::Medium
        } else {
            PriceTier::Premium
        }
    }
}

/// The tier of one product, by its position in the partitioned slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierAssignment {
    pub index: usize,
    pub tier: PriceTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSummary {
    pub tier: PriceTier,
    pub count: usize,
    pub mean_margin_pct: Decimal,
    pub mean_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierPartition {
    pub boundaries: TierBoundaries,
    /// One entry per input product, in input order.
    pub assignments: Vec<TierAssignment>,
    /// Economic, Medium, Premium.
    pub summaries: Vec<TierSummary>,
}

impl TierPartition {
    pub fn tier_at(&self, index: usize) -> Option<PriceTier> {
        self.assignments.get(index).map(|a| a.tier)
    }
}

/// Splits a product set into price terciles.
///
/// Boundaries are recomputed from the given set on every call, so the same
/// product can move between tiers when the set changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TierPartitioner;

impl TierPartitioner {
    pub fn new() -> Self {
        Self
    }

    /// Computes tercile boundaries and labels every product.
    ///
    /// Fails with `InsufficientData` when the prices cannot form three
    /// non-empty bins (empty set, or too few distinct prices).
    pub fn partition(&self, products: &[Product]) -> Result<TierPartition, AnalyticsError> {
        let prices: Vec<Decimal> = products.iter().map(|p| p.price).collect();
        let sorted = stats::sorted(&prices);

        let edges = [
            stats::quantile(&sorted, 0, 3),
            stats::quantile(&sorted, 1, 3),
            stats::quantile(&sorted, 2, 3),
            stats::quantile(&sorted, 3, 3),
        ];
        let [Some(min), Some(lower), Some(upper), Some(max)] = edges else {
            return Err(AnalyticsError::InsufficientData(
                "no products to split into price tiers".to_string(),
            ));
        };
        if !(min < lower && lower < upper && upper < max) {
            return Err(AnalyticsError::InsufficientData(format!(
                "price tier edges are not distinct ({min}, {lower}, {upper}, {max})"
            )));
        }

        let boundaries = TierBoundaries { min, lower, upper, max };
        let assignments: Vec<TierAssignment> = products
            .iter()
            .enumerate()
            .map(|(index, p)| TierAssignment {
                index,
                tier: boundaries.tier_of(p.price),
            })
            .collect();

        let summaries: Vec<TierSummary> = PriceTier::ALL
            .iter()
            .map(|&tier| summarize_tier(tier, products, &assignments))
            .collect();

        if let Some(empty) = summaries.iter().find(|s| s.count == 0) {
            return Err(AnalyticsError::InsufficientData(format!(
                "price tier '{}' would be empty",
                empty.tier
            )));
        }

        tracing::debug!(%lower, %upper, products = products.len(), "Price tiers computed.");
        Ok(TierPartition {
            boundaries,
            assignments,
            summaries,
        })
    }
}

fn summarize_tier(tier: PriceTier, products: &[Product], assignments: &[TierAssignment]) -> TierSummary {
    let members: Vec<&Product> = assignments
        .iter()
        .filter(|a| a.tier == tier)
        .map(|a| &products[a.index])
        .collect();
    let margins: Vec<Decimal> = members.iter().map(|p| p.margin_pct).collect();
    let prices: Vec<Decimal> = members.iter().map(|p| p.price).collect();

    TierSummary {
        tier,
        count: members.len(),
        mean_margin_pct: stats::mean(&margins),
        mean_price: stats::mean(&prices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn priced(prices: &[Decimal]) -> Vec<Product> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| Product {
                description: Some(format!("Producto {i}")),
                cost: price / dec!(2),
                price,
                profit: price / dec!(2),
                margin_pct: dec!(50),
            })
            .collect()
    }

    fn count(partition: &TierPartition, tier: PriceTier) -> usize {
        partition.assignments.iter().filter(|a| a.tier == tier).count()
    }

    #[test]
    fn terciles_are_balanced_when_divisible_by_three() {
        for n in [3usize, 6, 9, 12, 30] {
            // Unsorted, distinct prices.
            let prices: Vec<Decimal> = (0..n).map(|i| Decimal::from((i * 7) % n + 1) * dec!(1.25)).collect();
            let partition = TierPartitioner::new().partition(&priced(&prices)).unwrap();
            for tier in PriceTier::ALL {
                assert_eq!(count(&partition, tier), n / 3, "n = {n}, tier = {tier}");
            }
        }
    }

    #[test]
    fn assignments_follow_input_order() {
        let products = priced(&[dec!(300), dec!(100), dec!(200)]);
        let partition = TierPartitioner::new().partition(&products).unwrap();
        assert_eq!(partition.tier_at(0), Some(PriceTier::Premium));
        assert_eq!(partition.tier_at(1), Some(PriceTier::Economic));
        assert_eq!(partition.tier_at(2), Some(PriceTier::Medium));
        assert_eq!(partition.tier_at(3), None);
    }

    #[test]
    fn boundaries_are_recomputed_per_set() {
        let products = priced(&[dec!(10), dec!(20), dec!(30), dec!(40), dec!(50), dec!(60)]);
        let all = TierPartitioner::new().partition(&products).unwrap();
        let cheap = TierPartitioner::new().partition(&products[..3]).unwrap();
        // 30 is medium within the full set but premium within the cheap half.
        assert_eq!(all.tier_at(2), Some(PriceTier::Medium));
        assert_eq!(cheap.tier_at(2), Some(PriceTier::Premium));
        assert!(cheap.boundaries.upper < all.boundaries.upper);
    }

    #[test]
    fn summaries_cover_each_tier() {
        let partition = TierPartitioner::new()
            .partition(&priced(&[dec!(10), dec!(20), dec!(30)]))
            .unwrap();
        let tiers: Vec<PriceTier> = partition.summaries.iter().map(|s| s.tier).collect();
        assert_eq!(tiers, PriceTier::ALL.to_vec());
        assert_eq!(partition.summaries[2].mean_price, dec!(30));
        assert_eq!(partition.summaries[0].mean_margin_pct, dec!(50));
    }

    #[test]
    fn empty_set_is_insufficient() {
        let err = TierPartitioner::new().partition(&[]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData(_)));
    }

    #[test]
    fn too_few_distinct_prices_is_insufficient() {
        for prices in [
            vec![dec!(10)],
            vec![dec!(10), dec!(20)],
            vec![dec!(10), dec!(10), dec!(10), dec!(10)],
            vec![dec!(10), dec!(10), dec!(10), dec!(10), dec!(20)],
        ] {
            let result = TierPartitioner::new().partition(&priced(&prices));
            assert!(
                matches!(result, Err(AnalyticsError::InsufficientData(_))),
                "{prices:?} should not partition"
            );
        }
    }
}
