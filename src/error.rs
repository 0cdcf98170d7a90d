use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("end date {end} must be after start date {start}")]
    InvalidDuration {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("{0}")]
    InvalidAmount(String),
}

impl PricingError {
    /// Stable error name returned to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::InvalidDuration { .. } => "InvalidDuration",
            PricingError::InvalidAmount(_) => "InvalidAmount",
        }
    }
}
