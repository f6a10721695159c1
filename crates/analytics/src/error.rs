use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("invalid insight input: {0}")]
    InvalidInput(String),

    /// The snapshot does not carry the sales the insight needs.
    #[error("snapshot is missing sales data: {0}")]
    MissingSales(String),
}
