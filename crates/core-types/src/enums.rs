use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-way profitability label computed from fixed margin thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginCategory {
    Low,
    Medium,
    High,
}

impl MarginCategory {
    pub const ALL: [MarginCategory; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarginCategory::Low => "low",
            MarginCategory::Medium => "medium",
            MarginCategory::High => "high",
        }
    }
}

impl fmt::Display for MarginCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equal-frequency tercile of the price distribution of a filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Economic,
    Medium,
    Premium,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [Self::Economic, Self::Medium, Self::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::Economic => "economic",
            PriceTier::Medium => "medium",
            PriceTier::Premium => "premium",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric column a product set can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankField {
    Cost,
    Price,
    Profit,
    Margin,
}
