//! # Margin Monitor Analyzer
//!
//! Turns a loaded product set plus filter criteria into every derived view
//! a dashboard needs.
//!
//! The pipeline is explicit and pure: `filter(records, criteria)` produces a
//! new record set, and `Dashboard::build` derives the summary, labels,
//! rankings, department groups, price tiers and revenue projection from it.
//! The loaded set is only ever borrowed; nothing is memoized between calls.

pub mod dashboard;
pub mod departments;
pub mod error;
pub mod filter;
pub mod ranking;

pub use dashboard::{Dashboard, DashboardView, ProductView, TierOutcome};
pub use departments::{DepartmentDispersion, DepartmentGroup, DepartmentStats, DepartmentTable};
pub use error::AnalyzerError;
pub use filter::{
    apply, DepartmentFilter, DepartmentSelection, FilterCriteria, FilterEngine, MarginFilter,
    ProductFilter, TextFilter,
};
pub use ranking::{critical_products, top_n};
