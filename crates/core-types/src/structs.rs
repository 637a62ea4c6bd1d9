use crate::enums::{MarginCategory, RankField};
use crate::error::CoreError;
use crate::department::derive_department;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A single product row of the cost/price/margin analysis.
///
/// Records are immutable once loaded. Derived values (department, margin
/// category, price tier) are computed into separate view structures and
/// never written back onto the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// `None` when the description cell was empty.
    pub description: Option<String>,
    pub cost: Decimal,
    pub price: Decimal,
    /// price - cost, as found in the source file.
    pub profit: Decimal,
    /// profit / price * 100, as found in the source file.
    pub margin_pct: Decimal,
}

impl Product {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn department(&self, min_len: usize) -> Option<String> {
        derive_department(self.description(), min_len)
    }

    pub fn field(&self, field: RankField) -> Decimal {
        match field {
            RankField::Cost => self.cost,
            RankField::Price => self.price,
            RankField::Profit => self.profit,
            RankField::Margin => self.margin_pct,
        }
    }

    pub fn category(&self, thresholds: &CategoryThresholds) -> MarginCategory {
        thresholds.classify(self.margin_pct)
    }
}

/// A closed margin-percentage interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginRange {
    lo: Decimal,
    hi: Decimal,
}

impl MarginRange {
    pub fn new(lo: Decimal, hi: Decimal) -> Result<Self, CoreError> {
        if lo > hi {
            return Err(CoreError::InvalidInput(
                "margin range".to_string(),
                format!("lower bound {lo} is greater than upper bound {hi}"),
            ));
        }
        Ok(Self { lo, hi })
    }

    /// The range between two values, whichever order they come in.
    pub fn spanning(a: Decimal, b: Decimal) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn lo(&self) -> Decimal {
        self.lo
    }

    pub fn hi(&self) -> Decimal {
        self.hi
    }

    /// Inclusive on both ends.
    pub fn contains(&self, margin: Decimal) -> bool {
        self.lo <= margin && margin <= self.hi
    }

    /// The `[min, max]` margin of a record set, or `None` for an empty set.
    pub fn observed(products: &[Product]) -> Option<Self> {
        let mut iter = products.iter().map(|p| p.margin_pct);
        let first = iter.next()?;
        let (lo, hi) = iter.fold((first, first), |(lo, hi), m| (lo.min(m), hi.max(m)));
        Some(Self { lo, hi })
    }

    /// Clamps both bounds into `observed`.
    ///
    /// An interval disjoint from `observed` is returned unchanged so that it
    /// keeps matching nothing instead of collapsing onto an edge record.
    pub fn clamp_to(&self, observed: &MarginRange) -> Self {
        let lo = self.lo.max(observed.lo);
        let hi = self.hi.min(observed.hi);
        if lo > hi { *self } else { Self { lo, hi } }
    }
}

/// Fixed thresholds of the low / medium / high margin split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryThresholds {
    /// Margins strictly below this are `Low`.
    pub low_below: Decimal,
    /// Margins strictly above this are `High`.
    pub high_above: Decimal,
}

impl CategoryThresholds {
    pub fn new(low_below: Decimal, high_above: Decimal) -> Result<Self, CoreError> {
        if low_below > high_above {
            return Err(CoreError::InvalidInput(
                "category thresholds".to_string(),
                format!("low threshold {low_below} is above high threshold {high_above}"),
            ));
        }
        Ok(Self { low_below, high_above })
    }

    pub fn classify(&self, margin: Decimal) -> MarginCategory {
        if margin < self.low_below {
            MarginCategory::Low
        } else if margin > self.high_above {
            MarginCategory::High
        } else {
            MarginCategory::Medium
        }
    }
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            low_below: dec!(15),
            high_above: dec!(40),
        }
    }
}
