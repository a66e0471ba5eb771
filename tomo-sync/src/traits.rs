//! Traits for interfacing the sync engine with the chain

use async_trait::async_trait;

use crate::primitives::{OwnershipRecord, PrivacyWalletState, RawRecord, ScanDelta, Utxo};

/// Chain access consumed by the sync engine.
///
/// Implementations own transport, timeouts and the cryptography that attributes outputs and
/// records to a wallet. Every method may be called concurrently.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Provider specific header of a raw chain record
    type Header: Send + Sync;
    /// Errors associated with querying the chain
    type Error: std::error::Error + Send + Sync + 'static;

    /// Discovers the outputs currently attributable to `wallet`
    async fn scan(&self, wallet: &PrivacyWalletState) -> Result<ScanDelta, Self::Error>;

    /// Returns whether `utxo` has been spent on chain
    async fn is_spent(&self, utxo: &Utxo) -> Result<bool, Self::Error>;

    /// Highest transaction index known to `wallet`
    async fn last_known_index(&self, wallet: &PrivacyWalletState) -> Result<u64, Self::Error>;

    /// Fetches the raw records at `indices` in one batch, one record per index in request order
    async fn fetch_records(
        &self,
        indices: &[u64],
    ) -> Result<Vec<RawRecord<Self::Header>>, Self::Error>;

    /// Returns the decoded record if it is addressed to the wallet, `None` otherwise
    async fn check_ownership(
        &self,
        header: &Self::Header,
        payload: &[u8],
    ) -> Result<Option<OwnershipRecord>, Self::Error>;
}
