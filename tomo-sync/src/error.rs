//! Top level error module for the crate

/// Provider errors are carried type-erased so a single error enum serves every provider
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top level error enum encapsulating any error that may fail a whole sync operation
///
/// Failures that concern a single output or a single history record never surface here, they are
/// logged and the item is skipped.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Discovering new outputs failed, the wallet is unchanged
    #[error("Scan failed. {0}")]
    ScanFailed(#[source] BoxError),
    /// Every spent check of a reconciliation pass failed, the wallet is unchanged
    #[error("Spent check failed for all {failed} held outputs. {source}")]
    SpentCheckFailed {
        /// number of outputs that could not be checked
        failed: usize,
        /// the last error reported by the provider
        #[source]
        source: BoxError,
    },
    /// Resolving the scan window or fetching its records failed, no page is produced
    #[error("History scan failed. {0}")]
    HistoryScanFailed(#[source] BoxError),
}
