/// Errors from wave field construction and disturbance.
///
/// Every variant is a synchronous precondition failure; the field is never
/// left partially mutated when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaveError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl WaveError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
