use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    InsufficientData(String),
}
