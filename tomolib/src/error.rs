//! Top level error of the library

use tomo_sync::SyncError;

use crate::wallet::send::errors::TransferError;

/// Any error a [`crate::privacy_client::PrivacyClient`] operation may resolve to
#[derive(Debug, thiserror::Error)]
pub enum TomoLibError {
    #[error("Sync error. {0}")]
    Sync(#[from] SyncError),
    #[error("Transfer error. {0}")]
    Transfer(#[from] TransferError),
    #[error("Wallet file error. {0}")]
    Io(#[from] std::io::Error),
    #[error("Wallet snapshot could not be read or written. {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Unsupported wallet snapshot version {0}")]
    SnapshotVersion(u32),
}

pub type TomoLibResult<T> = Result<T, TomoLibError>;
