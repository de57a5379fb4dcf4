use thiserror::Error;

/// Why a navigation request did not produce a payload.
///
/// Reported by the [`crate::Navigator`] through its own notification channel
/// and handed to the table only so it can drop the in-flight filters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}
