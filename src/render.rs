//! Terminal rendering of the dashboard views.

use analytics::{RevenueProjection, SummaryReport, TierPartition};
use analyzer::{DepartmentDispersion, DepartmentStats, ProductView};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use configuration::LabelSettings;
use core_types::{MarginCategory, Product};
use rust_decimal::Decimal;

pub fn money(value: Decimal) -> String {
    format!("${:.2}", value)
}

pub fn percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn align_right(table: &mut Table, columns: &[usize]) {
    for &i in columns {
        if let Some(column) = table.column_mut(i) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// KPI tiles: the headline numbers of the filtered set.
pub fn summary_table(summary: &SummaryReport, labels: &LabelSettings) -> Table {
    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec!["Products analyzed".to_string(), summary.count.to_string()]);
    table.add_row(vec!["Mean margin".to_string(), percent(summary.mean_margin_pct)]);
    table.add_row(vec!["Median margin".to_string(), percent(summary.median_margin_pct)]);
    table.add_row(vec!["Mean sale price".to_string(), money(summary.mean_price)]);
    table.add_row(vec!["Mean profit per unit".to_string(), money(summary.mean_profit)]);
    table.add_row(vec!["Total profit".to_string(), money(summary.total_profit)]);
    table.add_row(vec![
        "Return on cost".to_string(),
        percent(summary.return_ratio.saturating_mul(Decimal::ONE_HUNDRED)),
    ]);
    for category in MarginCategory::ALL {
        table.add_row(vec![
            format!("{} margin products", labels.category(category)),
            summary.categories.get(category).to_string(),
        ]);
    }
    align_right(&mut table, &[1]);
    table
}

/// Product detail table with derived labels.
pub fn products_table(views: &[ProductView], labels: &LabelSettings) -> Table {
    let mut table = new_table(vec![
        "Description", "Cost", "Price", "Profit", "Margin", "Department", "Category", "Tier",
    ]);
    for view in views {
        let p = &view.product;
        table.add_row(vec![
            p.description().unwrap_or_default().to_string(),
            money(p.cost),
            money(p.price),
            money(p.profit),
            percent(p.margin_pct),
            view.department.clone().unwrap_or_default(),
            labels.category(view.category).to_string(),
            view.tier.map(|t| labels.tier(t).to_string()).unwrap_or_default(),
        ]);
    }
    align_right(&mut table, &[1, 2, 3, 4]);
    table
}

/// Ranked products, position first.
pub fn ranking_table(products: &[Product]) -> Table {
    let mut table = new_table(vec!["#", "Description", "Price", "Profit", "Margin"]);
    for (i, p) in products.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            p.description().unwrap_or_default().to_string(),
            money(p.price),
            money(p.profit),
            percent(p.margin_pct),
        ]);
    }
    align_right(&mut table, &[0, 2, 3, 4]);
    table
}

pub fn departments_table(stats: &[DepartmentStats]) -> Table {
    let mut table = new_table(vec!["Department", "Products", "Median margin", "Mean profit"]);
    for s in stats {
        table.add_row(vec![
            s.department.clone(),
            s.count.to_string(),
            percent(s.median_margin_pct),
            money(s.mean_profit),
        ]);
    }
    align_right(&mut table, &[1, 2, 3]);
    table
}

pub fn dispersion_table(spread: &[DepartmentDispersion]) -> Table {
    let mut table = new_table(vec!["Department", "Products", "Min", "Q1", "Median", "Q3", "Max"]);
    for d in spread {
        let m = &d.margins;
        table.add_row(vec![
            d.department.clone(),
            d.count.to_string(),
            percent(m.min),
            percent(m.q1),
            percent(m.median),
            percent(m.q3),
            percent(m.max),
        ]);
    }
    align_right(&mut table, &[1, 2, 3, 4, 5, 6]);
    table
}

pub fn tiers_table(partition: &TierPartition, labels: &LabelSettings) -> Table {
    let b = &partition.boundaries;
    let ranges = [
        format!("{} - {}", money(b.min), money(b.lower)),
        format!("{} - {}", money(b.lower), money(b.upper)),
        format!("{} - {}", money(b.upper), money(b.max)),
    ];
    let mut table = new_table(vec!["Tier", "Price range", "Products", "Mean price", "Mean margin"]);
    for (summary, range) in partition.summaries.iter().zip(ranges) {
        table.add_row(vec![
            labels.tier(summary.tier).to_string(),
            range,
            summary.count.to_string(),
            money(summary.mean_price),
            percent(summary.mean_margin_pct),
        ]);
    }
    align_right(&mut table, &[2, 3, 4]);
    table
}

pub fn revenue_table(projection: &RevenueProjection) -> Table {
    let mut table = new_table(vec!["Price increase", "Current revenue", "Additional revenue", "Projected revenue"]);
    table.add_row(vec![
        percent(projection.increase_pct),
        money(projection.current_revenue),
        money(projection.additional_revenue),
        money(projection.projected_revenue),
    ]);
    align_right(&mut table, &[0, 1, 2, 3]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsEngine;
    use rust_decimal_macros::dec;

    #[test]
    fn money_and_percent_use_two_decimals() {
        assert_eq!(money(dec!(150)), "$150.00");
        assert_eq!(percent(dec!(33.3333)), "33.33%");
    }

    #[test]
    fn summary_table_shows_kpis_and_labels() {
        let products = vec![Product {
            description: Some("Queso Cremoso".to_string()),
            cost: dec!(50),
            price: dec!(110),
            profit: dec!(60),
            margin_pct: dec!(54.5),
        }];
        let summary = AnalyticsEngine::default().summarize(&products);
        let labels = LabelSettings {
            high: "Alto".to_string(),
            ..LabelSettings::default()
        };
        let rendered = summary_table(&summary, &labels).to_string();
        assert!(rendered.contains("Products analyzed"));
        assert!(rendered.contains("54.50%"));
        assert!(rendered.contains("$110.00"));
        assert!(rendered.contains("120.00%"));
        assert!(rendered.contains("Alto margin products"));
    }

    #[test]
    fn ranking_table_numbers_rows() {
        let products = vec![Product {
            description: None,
            cost: dec!(1),
            price: dec!(2),
            profit: dec!(1),
            margin_pct: dec!(50),
        }];
        let rendered = ranking_table(&products).to_string();
        assert!(rendered.contains("50.00%"));
        assert!(rendered.contains("$2.00"));
    }
}
