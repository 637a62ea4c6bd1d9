use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyzerError {
    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(#[from] core_types::CoreError),
}
