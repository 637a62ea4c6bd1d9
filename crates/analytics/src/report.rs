use core_types::MarginCategory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The KPI bundle of a product set.
///
/// This struct is the output of the `AnalyticsEngine`. Every field is
/// defined for an empty set (counts and ratios are zero), so it can be
/// rendered without special-casing an empty filter result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryReport {
    pub count: usize,

    // Margins
    pub mean_margin_pct: Decimal,
    pub median_margin_pct: Decimal,
    pub min_margin_pct: Decimal,
    pub max_margin_pct: Decimal,

    // Per-unit averages
    pub mean_price: Decimal,
    pub mean_profit: Decimal,

    // Totals, one unit per product
    pub total_cost: Decimal,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    /// total_profit / total_cost; zero when total_cost is zero.
    pub return_ratio: Decimal,

    pub categories: CategoryCounts,
}

/// Number of products per margin category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl CategoryCounts {
    pub fn record(&mut self, category: MarginCategory) {
        match category {
            MarginCategory::Low => self.low += 1,
            MarginCategory::Medium => self.medium += 1,
            MarginCategory::High => self.high += 1,
        }
    }

    pub fn get(&self, category: MarginCategory) -> usize {
        match category {
            MarginCategory::Low => self.low,
            MarginCategory::Medium => self.medium,
            MarginCategory::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}
