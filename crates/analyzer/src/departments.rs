use analytics::stats::{self, FiveNumberSummary};
use configuration::DepartmentSettings;
use core_types::Product;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Aggregates of one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStats {
    pub department: String,
    pub count: usize,
    pub median_margin_pct: Decimal,
    pub mean_profit: Decimal,
}

/// A department's aggregates plus the margins they were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentGroup {
    pub stats: DepartmentStats,
    pub margins: Vec<Decimal>,
}

/// Margin spread of one department, for box-plot style views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentDispersion {
    pub department: String,
    pub count: usize,
    pub margins: FiveNumberSummary,
}

/// Products grouped by derived department.
///
/// Groups smaller than `min_group_size` are dropped. The rest are ordered by
/// median margin, highest first; ties keep first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DepartmentTable {
    groups: Vec<DepartmentGroup>,
}

impl DepartmentTable {
    pub fn build(products: &[Product], settings: &DepartmentSettings) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut members: Vec<(String, Vec<&Product>)> = Vec::new();

        for product in products {
            let Some(department) = product.department(settings.min_token_len) else {
                continue;
            };
            let slot = *index.entry(department.clone()).or_insert_with(|| {
                members.push((department, Vec::new()));
                members.len() - 1
            });
            members[slot].1.push(product);
        }

        let mut groups: Vec<DepartmentGroup> = members
            .into_iter()
            .filter(|(_, group)| group.len() >= settings.min_group_size)
            .map(|(department, group)| {
                let margins: Vec<Decimal> = group.iter().map(|p| p.margin_pct).collect();
                let profits: Vec<Decimal> = group.iter().map(|p| p.profit).collect();
                DepartmentGroup {
                    stats: DepartmentStats {
                        department,
                        count: group.len(),
                        median_margin_pct: stats::median(&margins),
                        mean_profit: stats::mean(&profits),
                    },
                    margins,
                }
            })
            .collect();

        groups.sort_by(|a, b| b.stats.median_margin_pct.cmp(&a.stats.median_margin_pct));

        tracing::debug!(groups = groups.len(), "Department table built.");
        Self { groups }
    }

    /// Every retained group, by median margin.
    pub fn groups(&self) -> &[DepartmentGroup] {
        &self.groups
    }

    pub fn stats(&self) -> Vec<DepartmentStats> {
        self.groups.iter().map(|g| g.stats.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The most profitable departments, by median margin.
    pub fn top_by_median(&self, limit: usize) -> Vec<DepartmentStats> {
        self.groups.iter().take(limit).map(|g| g.stats.clone()).collect()
    }

    /// The largest departments, by record count.
    pub fn top_by_count(&self, limit: usize) -> Vec<DepartmentStats> {
        self.largest(limit).into_iter().map(|g| g.stats.clone()).collect()
    }

    /// Margin spread of the largest departments.
    pub fn dispersion(&self, limit: usize) -> Vec<DepartmentDispersion> {
        self.largest(limit)
            .into_iter()
            .filter_map(|g| {
                Some(DepartmentDispersion {
                    department: g.stats.department.clone(),
                    count: g.stats.count,
                    margins: FiveNumberSummary::of(&g.margins)?,
                })
            })
            .collect()
    }

    fn largest(&self, limit: usize) -> Vec<&DepartmentGroup> {
        let mut by_count: Vec<&DepartmentGroup> = self.groups.iter().collect();
        by_count.sort_by(|a, b| b.stats.count.cmp(&a.stats.count));
        by_count.truncate(limit);
        by_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(desc: &str, margin: Decimal, profit: Decimal) -> Product {
        Product {
            description: Some(desc.to_string()),
            cost: dec!(100),
            price: dec!(100) + profit,
            profit,
            margin_pct: margin,
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("Queso Cremoso", dec!(50), dec!(10)),
            product("Salamin Primavera", dec!(30), dec!(20)),
            product("Queso Azul", dec!(60), dec!(30)),
            product("Salamin Picado", dec!(20), dec!(40)),
            product("Queso Rallado", dec!(40), dec!(20)),
            product("Salamin Fino", dec!(10), dec!(30)),
            product("Salamin Tandil", dec!(25), dec!(10)),
            product("Pan Lactal", dec!(90), dec!(5)),
            product("Pan Negro", dec!(90), dec!(5)),
            product("De Jamon", dec!(90), dec!(5)),
            product("De Pollo", dec!(90), dec!(5)),
            product("De Cerdo", dec!(90), dec!(5)),
        ]
    }

    fn departments(stats: &[DepartmentStats]) -> Vec<&str> {
        stats.iter().map(|s| s.department.as_str()).collect()
    }

    #[test]
    fn groups_are_aggregated_and_small_ones_dropped() {
        let table = DepartmentTable::build(&sample(), &DepartmentSettings::default());
        // "Pan" has only two products; "De" is not a department.
        assert_eq!(departments(&table.stats()), ["Queso", "Salamin"]);

        let queso = &table.groups()[0].stats;
        assert_eq!(queso.count, 3);
        assert_eq!(queso.median_margin_pct, dec!(50));
        assert_eq!(queso.mean_profit, dec!(20));

        let salamin = &table.groups()[1].stats;
        assert_eq!(salamin.count, 4);
        assert_eq!(salamin.median_margin_pct, dec!(22.5));
        assert_eq!(salamin.mean_profit, dec!(25));
    }

    #[test]
    fn median_and_count_orderings_are_distinct() {
        let table = DepartmentTable::build(&sample(), &DepartmentSettings::default());
        assert_eq!(departments(&table.top_by_median(15)), ["Queso", "Salamin"]);
        assert_eq!(departments(&table.top_by_count(10)), ["Salamin", "Queso"]);
        assert_eq!(departments(&table.top_by_median(1)), ["Queso"]);
        assert_eq!(departments(&table.top_by_count(1)), ["Salamin"]);
    }

    #[test]
    fn smaller_minimum_keeps_small_groups() {
        let settings = DepartmentSettings {
            min_group_size: 2,
            ..DepartmentSettings::default()
        };
        let table = DepartmentTable::build(&sample(), &settings);
        assert_eq!(departments(&table.stats()), ["Pan", "Queso", "Salamin"]);
    }

    #[test]
    fn dispersion_uses_largest_groups() {
        let table = DepartmentTable::build(&sample(), &DepartmentSettings::default());
        let spread = table.dispersion(1);
        assert_eq!(spread.len(), 1);
        assert_eq!(spread[0].department, "Salamin");
        assert_eq!(spread[0].margins.min, dec!(10));
        assert_eq!(spread[0].margins.median, dec!(22.5));
        assert_eq!(spread[0].margins.max, dec!(30));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = DepartmentTable::build(&[], &DepartmentSettings::default());
        assert!(table.is_empty());
        assert!(table.top_by_median(15).is_empty());
        assert!(table.dispersion(10).is_empty());
    }
}
