use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Required column '{0}' is missing from the header row")]
    MissingColumn(String),

    #[error("Malformed row at line {line}: column '{column}' has unparsable value '{value}'")]
    MalformedRow {
        line: u64,
        column: String,
        value: String,
    },

    #[error("I/O error while accessing the dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
