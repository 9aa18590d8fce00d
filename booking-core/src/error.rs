use crate::allocation::Tier;

/// Input validation failures. Nothing inside the allocator itself can fail
/// once its inputs are well-formed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("invalid {tier} capacity: {capacity}")]
    InvalidCapacity { tier: Tier, capacity: i64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl BookingError {
    pub(crate) fn invalid_amount(reason: impl Into<String>) -> Self {
        BookingError::InvalidAmount {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(err: serde_json::Error) -> Self {
        BookingError::InvalidRequest(err.to_string())
    }
}
