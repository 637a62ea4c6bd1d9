//! # Margin Monitor Dataset Crate
//!
//! Reads the pre-computed product table into memory and writes filtered
//! subsets back out, in the same locale-specific format.
//!
//! ## Format
//!
//! Semicolon-delimited text with a decimal comma and a header row. The
//! delimiter, separators and column names all come from `SourceSettings`.
//! Numeric cells are parsed strictly: a cell that is not a well-formed
//! number makes the whole row malformed instead of becoming zero.
//!
//! ## Public API
//!
//! - `load_products` / `read_products`: file or reader to `LoadOutcome`.
//! - `export_products` / `write_products`: products to file or writer.
//! - `DatasetError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod locale;
pub mod reader;
pub mod writer;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use locale::NumberFormat;
pub use reader::{load_products, read_products, LoadOutcome, RowIssue};
pub use writer::{export_products, write_products};
