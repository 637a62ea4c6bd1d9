use crate::report::{CategoryCounts, SummaryReport};
use crate::stats;
use core_types::{CategoryThresholds, MarginCategory, Product};
use rust_decimal::Decimal;

/// A stateless calculator for the summary statistics of a product set.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {
    thresholds: CategoryThresholds,
}

impl AnalyticsEngine {
    pub fn new(thresholds: CategoryThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &CategoryThresholds {
        &self.thresholds
    }

    /// Labels a single product with its margin category.
    pub fn categorize(&self, product: &Product) -> MarginCategory {
        product.category(&self.thresholds)
    }

    /// Counts the products per margin category.
    pub fn category_counts(&self, products: &[Product]) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for product in products {
            counts.record(self.categorize(product));
        }
        counts
    }

    /// Calculates the summary statistics of `products`.
    ///
    /// An empty slice produces a zeroed report.
    pub fn summarize(&self, products: &[Product]) -> SummaryReport {
        let mut report = SummaryReport::default();
        if products.is_empty() {
            return report;
        }

        let margins: Vec<Decimal> = products.iter().map(|p| p.margin_pct).collect();
        let prices: Vec<Decimal> = products.iter().map(|p| p.price).collect();
        let profits: Vec<Decimal> = products.iter().map(|p| p.profit).collect();

        report.count = products.len();

        report.mean_margin_pct = stats::mean(&margins);
        report.median_margin_pct = stats::median(&margins);
        report.min_margin_pct = margins.iter().copied().min().unwrap_or_default();
        report.max_margin_pct = margins.iter().copied().max().unwrap_or_default();

        report.mean_price = stats::mean(&prices);
        report.mean_profit = stats::mean(&profits);

        report.total_cost = stats::sum(products.iter().map(|p| p.cost));
        report.total_revenue = stats::sum(prices.iter().copied());
        report.total_profit = stats::sum(profits.iter().copied());
        report.return_ratio = stats::ratio(report.total_profit, report.total_cost).unwrap_or_default();

        report.categories = self.category_counts(products);

        tracing::debug!(
            count = report.count,
            mean_margin = %report.mean_margin_pct,
            "Summary calculated."
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(desc: &str, cost: Decimal, price: Decimal, margin: Decimal) -> Product {
        Product {
            description: Some(desc.to_string()),
            cost,
            price,
            profit: price - cost,
            margin_pct: margin,
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("Salamin Primavera", dec!(100), dec!(150), dec!(33.33)),
            product("Queso Cremoso", dec!(50), dec!(110), dec!(54.5)),
            product("Pan Lactal", dec!(90), dec!(100), dec!(10)),
        ]
    }

    #[test]
    fn summary_on_empty_set_is_zeroed() {
        let report = AnalyticsEngine::default().summarize(&[]);
        assert_eq!(report, SummaryReport::default());
        assert_eq!(report.count, 0);
        assert_eq!(report.return_ratio, Decimal::ZERO);
        assert_eq!(report.mean_margin_pct, Decimal::ZERO);
        assert_eq!(report.categories.total(), 0);
    }

    #[test]
    fn summary_of_sample() {
        let report = AnalyticsEngine::default().summarize(&sample());
        assert_eq!(report.count, 3);
        assert_eq!(report.median_margin_pct, dec!(33.33));
        assert_eq!(report.min_margin_pct, dec!(10));
        assert_eq!(report.max_margin_pct, dec!(54.5));
        assert_eq!(report.total_cost, dec!(240));
        assert_eq!(report.total_revenue, dec!(360));
        assert_eq!(report.total_profit, dec!(120));
        assert_eq!(report.return_ratio, dec!(0.5));
        assert_eq!(report.mean_price, dec!(120));
        assert_eq!(report.mean_profit, dec!(40));
        assert_eq!(report.mean_margin_pct.round_dp(2), dec!(32.61));
    }

    #[test]
    fn zero_total_cost_gives_zero_ratio() {
        let free = vec![product("Muestra gratis", dec!(0), dec!(10), dec!(100))];
        let report = AnalyticsEngine::default().summarize(&free);
        assert_eq!(report.total_cost, Decimal::ZERO);
        assert_eq!(report.return_ratio, Decimal::ZERO);
    }

    #[test]
    fn totals_beyond_the_decimal_range_saturate() {
        let huge = vec![
            product("Lote A", dec!(1), Decimal::MAX, dec!(99)),
            product("Lote B", dec!(1), Decimal::MAX, dec!(99)),
        ];
        let report = AnalyticsEngine::default().summarize(&huge);
        assert_eq!(report.count, 2);
        assert_eq!(report.total_revenue, Decimal::MAX);
        assert_eq!(report.total_profit, Decimal::MAX);
        assert_eq!(report.return_ratio, Decimal::MAX / dec!(2));
        assert!(Decimal::MAX - report.mean_price <= Decimal::ONE);
    }

    #[test]
    fn categories_partition_every_product() {
        let mut products = sample();
        products.push(product("Borde bajo", dec!(85), dec!(100), dec!(15)));
        products.push(product("Borde alto", dec!(60), dec!(100), dec!(40)));
        products.push(product("Perdida", dec!(120), dec!(100), dec!(-20)));

        let engine = AnalyticsEngine::default();
        let report = engine.summarize(&products);
        assert_eq!(report.categories.total(), report.count);
        assert_eq!(report.categories.low, 2);
        assert_eq!(report.categories.medium, 3);
        assert_eq!(report.categories.high, 1);
        for category in MarginCategory::ALL {
            let n = products.iter().filter(|p| engine.categorize(p) == category).count();
            assert_eq!(report.categories.get(category), n);
        }
    }

    #[test]
    fn thresholds_are_configurable() {
        let engine = AnalyticsEngine::new(CategoryThresholds::new(dec!(20), dec!(50)).unwrap());
        let counts = engine.category_counts(&sample());
        assert_eq!(counts, CategoryCounts { low: 1, medium: 1, high: 1 });
    }
}
