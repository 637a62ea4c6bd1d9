use crate::departments::{DepartmentDispersion, DepartmentStats, DepartmentTable};
use crate::error::AnalyzerError;
use crate::filter::{DepartmentSelection, FilterCriteria, FilterEngine};
use crate::ranking::{critical_products, top_n};
use analytics::{
    simulate_price_increase, AnalyticsEngine, RevenueProjection, SummaryReport, TierPartition,
    TierPartitioner,
};
use configuration::{LowerBoundPolicy, Settings};
use core_types::{MarginCategory, MarginRange, PriceTier, Product, RankField};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

/// A filtered product with its derived labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub department: Option<String>,
    pub category: MarginCategory,
    /// `None` when the filtered set could not be split into tiers.
    pub tier: Option<PriceTier>,
}

/// Result of the price-tier step. A set that cannot be split is an
/// explained empty result, not a failure of the whole view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TierOutcome {
    Partitioned(TierPartition),
    Unavailable { reason: String },
}

impl TierOutcome {
    pub fn partition(&self) -> Option<&TierPartition> {
        match self {
            TierOutcome::Partitioned(p) => Some(p),
            TierOutcome::Unavailable { .. } => None,
        }
    }
}

/// Everything a presentation layer needs for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// The criteria actually applied, after clamping.
    pub criteria: FilterCriteria,
    pub observed_margin: Option<MarginRange>,
    pub loaded_count: usize,
    pub summary: SummaryReport,
    pub products: Vec<ProductView>,
    pub top_products: Vec<Product>,
    /// Highest median margin first, for the ranking chart.
    pub department_ranking: Vec<DepartmentStats>,
    /// Largest departments, for the dispersion chart.
    pub department_dispersion: Vec<DepartmentDispersion>,
    /// Every retained department group.
    pub departments: Vec<DepartmentStats>,
    pub price_tiers: TierOutcome,
    pub revenue: RevenueProjection,
    pub critical_products: Vec<Product>,
}

impl DashboardView {
    /// The filtered records without their labels.
    pub fn filtered_products(&self) -> Vec<Product> {
        self.products.iter().map(|v| v.product.clone()).collect()
    }
}

/// The pipeline from a loaded product set to a `DashboardView`.
///
/// Holds only settings. Each call to `build` recomputes every view from the
/// given records, so it can be invoked on every input change.
#[derive(Debug, Clone)]
pub struct Dashboard {
    settings: Settings,
    engine: AnalyticsEngine,
    filter: FilterEngine,
    partitioner: TierPartitioner,
    increase_pct: Decimal,
}

impl Dashboard {
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            engine: AnalyticsEngine::new(settings.categories),
            filter: FilterEngine::new(&settings.departments),
            partitioner: TierPartitioner::new(),
            increase_pct: settings.simulator.default_pct,
        }
    }

    /// Overrides the price increase used by the revenue simulator.
    pub fn with_increase_pct(mut self, pct: Decimal) -> Self {
        self.increase_pct = pct;
        self
    }

    pub fn filter_engine(&self) -> &FilterEngine {
        &self.filter
    }

    /// Builds filter criteria from optional user input.
    ///
    /// A missing upper bound defaults to the observed maximum margin, a
    /// missing lower bound to the observed minimum or zero depending on
    /// `filters.lower_bound`. A filled-in bound never crosses the other
    /// bound, so a one-sided request past the data yields an empty result.
    /// Only two explicit, inverted bounds are rejected. An empty dataset
    /// leaves missing bounds open.
    pub fn criteria(
        &self,
        loaded: &[Product],
        min_margin: Option<Decimal>,
        max_margin: Option<Decimal>,
        text: Option<String>,
        department: Option<&str>,
    ) -> Result<FilterCriteria, AnalyzerError> {
        let observed = MarginRange::observed(loaded);
        let default_lo = match (self.settings.filters.lower_bound, observed) {
            (LowerBoundPolicy::Zero, _) => Some(Decimal::ZERO),
            (LowerBoundPolicy::Observed, Some(o)) => Some(o.lo()),
            (LowerBoundPolicy::Observed, None) => None,
        };
        let default_hi = observed.map(|o| o.hi());

        let margin = match (min_margin, max_margin) {
            (Some(lo), Some(hi)) => Some(MarginRange::new(lo, hi)?),
            (Some(lo), None) => {
                let hi = default_hi.map_or(Decimal::MAX, |hi| hi.max(lo));
                Some(MarginRange::spanning(lo, hi))
            }
            (None, Some(hi)) => {
                let lo = default_lo.map_or(Decimal::MIN, |lo| lo.min(hi));
                Some(MarginRange::spanning(lo, hi))
            }
            (None, None) if default_lo.is_none() && default_hi.is_none() => None,
            (None, None) => {
                let lo = default_lo.unwrap_or(Decimal::MIN);
                let hi = default_hi.map_or(Decimal::MAX, |hi| hi.max(lo));
                Some(MarginRange::spanning(lo, hi))
            }
        };

        Ok(FilterCriteria {
            margin,
            text,
            department: department.map(DepartmentSelection::parse).unwrap_or_default(),
        })
    }

    /// Filters `loaded` and derives every view from the result.
    pub fn build(&self, loaded: &[Product], criteria: &FilterCriteria) -> DashboardView {
        let observed = MarginRange::observed(loaded);
        let criteria = criteria.clamped_to(observed.as_ref());
        let filtered = self.filter.apply(loaded, &criteria);
        info!(loaded = loaded.len(), filtered = filtered.len(), "Dashboard filter applied.");

        let summary = self.engine.summarize(&filtered);

        let price_tiers = match self.partitioner.partition(&filtered) {
            Ok(partition) => TierOutcome::Partitioned(partition),
            Err(e) => {
                debug!(error = %e, "Price tiers unavailable.");
                TierOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        let min_token_len = self.settings.departments.min_token_len;
        let products = filtered
            .iter()
            .enumerate()
            .map(|(i, p)| ProductView {
                product: p.clone(),
                department: p.department(min_token_len),
                category: self.engine.categorize(p),
                tier: price_tiers.partition().and_then(|t| t.tier_at(i)),
            })
            .collect();

        let dept = &self.settings.departments;
        let table = DepartmentTable::build(&filtered, dept);

        DashboardView {
            observed_margin: observed,
            loaded_count: loaded.len(),
            summary,
            products,
            top_products: top_n(&filtered, RankField::Margin, self.settings.ranking.top_products),
            department_ranking: table.top_by_median(dept.chart_limit),
            department_dispersion: table.dispersion(dept.dispersion_limit),
            departments: table.stats(),
            price_tiers,
            revenue: simulate_price_increase(&filtered, self.increase_pct),
            critical_products: critical_products(&filtered, self.settings.ranking.critical_below),
            criteria,
        }
    }
}
