//! Errors of a token transfer

use std::fmt;

use tomo_sync::error::BoxError;
use tomo_units::AmountError;

/// Contract call a transfer failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    FeeEstimation,
    Submission,
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStage::FeeEstimation => write!(f, "fee estimation"),
            TransferStage::Submission => write!(f, "submission"),
        }
    }
}

#[allow(missing_docs)] // error types document themselves
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Invalid amount. {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("Unknown token standard '{0}'. Expected TRC20 or TRC21")]
    InvalidTokenStandard(String),
    #[error("Transfer failed during {stage}. {source}")]
    TransferFailed {
        stage: TransferStage,
        #[source]
        source: BoxError,
    },
}

impl TransferError {
    pub(crate) fn failed_at<E>(stage: TransferStage) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |e| TransferError::TransferFailed {
            stage,
            source: Box::new(e),
        }
    }

    /// The stage a failed contract call happened in, `None` for input errors
    pub fn stage(&self) -> Option<TransferStage> {
        match self {
            TransferError::TransferFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
