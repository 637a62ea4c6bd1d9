use crate::stats;
use core_types::Product;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Revenue effect of raising every price by the same percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueProjection {
    pub increase_pct: Decimal,
    /// Sum of current prices, one unit per product.
    pub current_revenue: Decimal,
    pub additional_revenue: Decimal,
    pub projected_revenue: Decimal,
}

/// Projects the extra revenue of a `pct`% price increase, assuming one unit
/// sold per product and unchanged demand. Amounts beyond the `Decimal`
/// range saturate.
pub fn simulate_price_increase(products: &[Product], pct: Decimal) -> RevenueProjection {
    let factor = pct / dec!(100);
    let current_revenue = stats::sum(products.iter().map(|p| p.price));
    let additional_revenue = stats::sum(products.iter().map(|p| p.price.saturating_mul(factor)));

    RevenueProjection {
        increase_pct: pct,
        current_revenue,
        additional_revenue,
        projected_revenue: current_revenue.saturating_add(additional_revenue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: Decimal) -> Product {
        Product {
            description: None,
            cost: Decimal::ZERO,
            price,
            profit: price,
            margin_pct: dec!(100),
        }
    }

    #[test]
    fn ten_percent_over_two_products() {
        let products = [product(dec!(150)), product(dec!(110))];
        let projection = simulate_price_increase(&products, dec!(10));
        assert_eq!(projection.additional_revenue, dec!(26.0));
        assert_eq!(projection.current_revenue, dec!(260));
        assert_eq!(projection.projected_revenue, dec!(286));
    }

    #[test]
    fn empty_set_and_zero_percent_project_nothing() {
        assert_eq!(simulate_price_increase(&[], dec!(10)).additional_revenue, Decimal::ZERO);
        let products = [product(dec!(150))];
        assert_eq!(simulate_price_increase(&products, dec!(0)).additional_revenue, Decimal::ZERO);
    }

    #[test]
    fn huge_prices_saturate() {
        let products = [product(Decimal::MAX), product(Decimal::MAX)];
        let projection = simulate_price_increase(&products, dec!(1000));
        assert_eq!(projection.current_revenue, Decimal::MAX);
        assert_eq!(projection.additional_revenue, Decimal::MAX);
        assert_eq!(projection.projected_revenue, Decimal::MAX);
    }

    #[test]
    fn negative_percentage_is_a_price_cut() {
        let products = [product(dec!(200))];
        let projection = simulate_price_increase(&products, dec!(-5));
        assert_eq!(projection.additional_revenue, dec!(-10));
        assert_eq!(projection.projected_revenue, dec!(190));
    }
}
