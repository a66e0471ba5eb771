//! Loading and saving the client's wallet

use tomo_sync::ChainProvider;
use tomoconfig::TomoConfig;

use super::PrivacyClient;
use crate::error::TomoLibResult;
use crate::wallet::disk::{read_snapshot, write_snapshot};
use crate::wallet::traits::ContractClient;

impl<P, C> PrivacyClient<P, C>
where
    P: ChainProvider,
    C: ContractClient,
{
    /// Creates a client for the wallet stored at `config`'s wallet path
    pub fn load_from_disk(config: TomoConfig, provider: P, contracts: C) -> TomoLibResult<Self> {
        let path = config.get_wallet_path()?;
        let wallet = read_snapshot(&path)?;
        log::debug!(
            "Read wallet with {} outputs from {:?}",
            wallet.utxos().len(),
            path
        );
        Ok(Self::create_from_wallet(wallet, config, provider, contracts))
    }

    /// Writes the current wallet to `config`'s wallet path
    pub async fn save_to_disk(&self) -> TomoLibResult<()> {
        let _sync_guard = self.sync_lock.lock().await;
        let wallet = self.wallet_state().await;
        write_snapshot(&self.config.get_wallet_path()?, &wallet)
    }
}
