#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The bare human-readable reason, without the variant prefix.
    pub fn reason(&self) -> &str {
        match self {
            CoreError::Validation(msg) | CoreError::InvalidRecord(msg) | CoreError::Internal(msg) => {
                msg
            }
        }
    }
}
