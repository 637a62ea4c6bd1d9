//! # Margin Monitor Analytics
//!
//! Descriptive statistics over a (filtered) product set.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** this crate has no knowledge of files, configuration
//!   loading or presentation. It depends only on `core-types`.
//! - **Stateless calculation:** every function takes a product slice and
//!   returns a new structure. Nothing is cached, so results always reflect
//!   the set they were given.
//! - **Total over empty input:** an empty product set yields zeroed
//!   statistics, never an error or a NaN. Only the price-tier partition can
//!   fail, with `AnalyticsError::InsufficientData`.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: summary statistics into a `SummaryReport`.
//! - `TierPartitioner`: equal-frequency price terciles.
//! - `simulate_price_increase`: linear revenue projection.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod simulator;
pub mod stats;
pub mod tiers;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{CategoryCounts, SummaryReport};
pub use simulator::{simulate_price_increase, RevenueProjection};
pub use tiers::{TierAssignment, TierBoundaries, TierPartition, TierPartitioner, TierSummary};
