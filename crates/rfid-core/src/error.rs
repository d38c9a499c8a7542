//! Error types for the relay core.

/// Errors that can occur while constructing relay components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    /// A history store cannot hold zero events.
    #[error("history capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),
}
