pub mod department;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use department::derive_department;
pub use enums::{MarginCategory, PriceTier, RankField};
pub use error::CoreError;
pub use structs::{CategoryThresholds, MarginRange, Product};
