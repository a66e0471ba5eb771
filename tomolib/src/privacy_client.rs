//! The application facing handle of a privacy wallet

use primitive_types::U256;
use tokio::sync::{Mutex, RwLock};
use tomo_sync::primitives::PrivacyWalletState;
use tomo_sync::ChainProvider;
use tomoconfig::TomoConfig;

use crate::wallet::traits::ContractClient;

pub mod disk;
pub mod send;
pub mod sync;

/// Owns the privacy wallet state together with the chain and contract access it is driven with
pub struct PrivacyClient<P, C> {
    pub(crate) config: TomoConfig,
    pub(crate) wallet: RwLock<PrivacyWalletState>,
    // serializes reconciliations and saves, transfers never take it
    sync_lock: Mutex<()>,
    pub(crate) provider: P,
    pub(crate) contracts: C,
}

impl<P, C> PrivacyClient<P, C>
where
    P: ChainProvider,
    C: ContractClient,
{
    pub fn create_from_wallet(
        wallet: PrivacyWalletState,
        config: TomoConfig,
        provider: P,
        contracts: C,
    ) -> Self {
        log::debug!(
            "Created privacy client for {} on {}",
            wallet.public_address(),
            config.chain
        );
        Self {
            config,
            wallet: RwLock::new(wallet),
            sync_lock: Mutex::new(()),
            provider,
            contracts,
        }
    }

    pub fn config(&self) -> &TomoConfig {
        &self.config
    }

    /// A copy of the current wallet state
    pub async fn wallet_state(&self) -> PrivacyWalletState {
        self.wallet.read().await.clone()
    }

    /// Privacy balance in base units as of the last successful refresh
    pub async fn privacy_balance(&self) -> U256 {
        self.wallet.read().await.balance()
    }
}
