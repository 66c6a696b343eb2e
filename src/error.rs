//! Error types for batch-notify.

use tokio::sync::broadcast;

/// Result type alias for batch-notify operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Errors surfaced while receiving from a change stream.
///
/// The notify side is total: enqueueing and delivering changes never fail.
/// The receive side inherits the two runtime conditions of the underlying
/// broadcast channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The subscriber fell behind and older batches were discarded for it.
    ///
    /// Only this subscriber is affected; receiving again continues from the
    /// oldest batch still retained by the channel.
    #[error("change stream lagged, {skipped} batches were dropped")]
    Lagged {
        /// Number of batches this subscriber missed.
        skipped: u64,
    },

    /// Every handle to the notifier was dropped; no further batches will
    /// arrive on this stream.
    #[error("change stream closed, notifier was dropped")]
    Closed,
}

impl From<broadcast::error::RecvError> for NotifyError {
    fn from(err: broadcast::error::RecvError) -> Self {
        match err {
            broadcast::error::RecvError::Closed => Self::Closed,
            broadcast::error::RecvError::Lagged(skipped) => Self::Lagged { skipped },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recv_errors_map_onto_notify_errors() {
        assert_eq!(
            NotifyError::from(broadcast::error::RecvError::Closed),
            NotifyError::Closed
        );
        assert_eq!(
            NotifyError::from(broadcast::error::RecvError::Lagged(3)),
            NotifyError::Lagged { skipped: 3 }
        );
    }

    #[test]
    fn display_names_the_condition() {
        let err = NotifyError::Lagged { skipped: 2 };
        assert!(err.to_string().contains("2 batches"));
        assert!(NotifyError::Closed.to_string().contains("closed"));
    }
}
