use configuration::DepartmentSettings;
use core_types::{MarginRange, Product};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentinel accepted by `DepartmentSelection::parse` to disable the
/// department predicate.
pub const ALL_DEPARTMENTS: &str = "all";

/// Which derived department a product must belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentSelection {
    #[default]
    All,
    Only(String),
}

impl DepartmentSelection {
    /// Exactly `"all"` selects every department. Other spellings, such as
    /// `"All"`, name a department.
    pub fn parse(value: &str) -> Self {
        if value == ALL_DEPARTMENTS {
            DepartmentSelection::All
        } else {
            DepartmentSelection::Only(value.to_string())
        }
    }
}

/// The user's filter choices for one interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub margin: Option<MarginRange>,
    pub text: Option<String>,
    pub department: DepartmentSelection,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, range: MarginRange) -> Self {
        self.margin = Some(range);
        self
    }

    pub fn with_text(mut self, query: impl Into<String>) -> Self {
        self.text = Some(query.into());
        self
    }

    pub fn with_department(mut self, department: DepartmentSelection) -> Self {
        self.department = department;
        self
    }

    /// Clamps the margin interval into the observed range of the loaded set.
    pub fn clamped_to(&self, observed: Option<&MarginRange>) -> Self {
        let mut clamped = self.clone();
        if let (Some(range), Some(observed)) = (self.margin, observed) {
            clamped.margin = Some(range.clamp_to(observed));
        }
        clamped
    }
}

/// A single predicate over products.
///
/// Predicates are independent of each other, so applying a set of them in
/// any order keeps the same products.
pub trait ProductFilter {
    fn matches(&self, product: &Product) -> bool;

    /// Returns a stable name for logging.
    fn name(&self) -> &'static str;
}

/// Keeps products whose margin lies in a closed interval.
pub struct MarginFilter {
    range: MarginRange,
}

impl MarginFilter {
    pub fn new(range: MarginRange) -> Self {
        Self { range }
    }
}

impl ProductFilter for MarginFilter {
    fn matches(&self, product: &Product) -> bool {
        self.range.contains(product.margin_pct)
    }

    fn name(&self) -> &'static str {
        "margin"
    }
}

/// Case-insensitive substring search on the description.
///
/// An empty query matches everything; a missing description matches nothing.
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }
}

impl ProductFilter for TextFilter {
    fn matches(&self, product: &Product) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        product
            .description()
            .is_some_and(|d| d.to_lowercase().contains(&self.needle))
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

/// Exact match on the derived department.
pub struct DepartmentFilter {
    selection: DepartmentSelection,
    min_token_len: usize,
}

impl DepartmentFilter {
    pub fn new(selection: DepartmentSelection, min_token_len: usize) -> Self {
        Self {
            selection,
            min_token_len,
        }
    }
}

impl ProductFilter for DepartmentFilter {
    fn matches(&self, product: &Product) -> bool {
        match &self.selection {
            DepartmentSelection::All => true,
            DepartmentSelection::Only(wanted) => {
                product.department(self.min_token_len).as_deref() == Some(wanted.as_str())
            }
        }
    }

    fn name(&self) -> &'static str {
        "department"
    }
}

/// Applies filter criteria to a product set.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    min_token_len: usize,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(&DepartmentSettings::default())
    }
}

impl FilterEngine {
    pub fn new(departments: &DepartmentSettings) -> Self {
        Self {
            min_token_len: departments.min_token_len,
        }
    }

    /// The active predicates of `criteria`. Absent criteria add none.
    pub fn predicates(&self, criteria: &FilterCriteria) -> Vec<Box<dyn ProductFilter>> {
        let mut predicates: Vec<Box<dyn ProductFilter>> = Vec::new();
        if let Some(range) = criteria.margin {
            predicates.push(Box::new(MarginFilter::new(range)));
        }
        if let Some(query) = criteria.text.as_deref().filter(|q| !q.is_empty()) {
            predicates.push(Box::new(TextFilter::new(query)));
        }
        if criteria.department != DepartmentSelection::All {
            predicates.push(Box::new(DepartmentFilter::new(
                criteria.department.clone(),
                self.min_token_len,
            )));
        }
        predicates
    }

    /// Returns the products matching every predicate, in input order.
    pub fn apply(&self, products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
        let mut kept = products.to_vec();
        for predicate in self.predicates(criteria) {
            let before = kept.len();
            kept.retain(|p| predicate.matches(p));
            debug!(
                filter = predicate.name(),
                kept = kept.len(),
                removed = before - kept.len(),
                "Filter applied."
            );
        }
        kept
    }
}

/// Filters `records` by margin interval, text query and department.
///
/// Shorthand for `FilterEngine::default().apply` with the default
/// department rules.
pub fn apply(
    records: &[Product],
    margin_range: Option<MarginRange>,
    text_query: Option<&str>,
    department: Option<&str>,
) -> Vec<Product> {
    let criteria = FilterCriteria {
        margin: margin_range,
        text: text_query.map(str::to_string),
        department: department.map(DepartmentSelection::parse).unwrap_or_default(),
    };
    FilterEngine::default().apply(records, &criteria)
}
