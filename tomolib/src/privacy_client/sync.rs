//! Keeping the wallet in step with the chain

use primitive_types::U256;
use tomo_sync::ownership::scan_ownership_with_decimals;
use tomo_sync::primitives::NormalizedHistoryPage;
use tomo_sync::reconcile::{reconcile, ReconcileReport, Reconciliation};
use tomo_sync::ChainProvider;

use super::PrivacyClient;
use crate::error::TomoLibResult;
use crate::wallet::disk::write_snapshot;
use crate::wallet::traits::ContractClient;

impl<P, C> PrivacyClient<P, C>
where
    P: ChainProvider,
    C: ContractClient,
{
    /// Reconciles the wallet with the chain, persists the result and only then makes it current.
    ///
    /// On error neither the in-memory state nor the snapshot on disk has changed.
    pub async fn do_refresh_privacy(&self, main_balance: U256) -> TomoLibResult<ReconcileReport> {
        let _sync_guard = self.sync_lock.lock().await;

        let current = self.wallet_state().await;
        let Reconciliation { wallet, report } =
            reconcile(&current, &self.provider, main_balance).await?;

        write_snapshot(&self.config.get_wallet_path()?, &wallet)?;
        *self.wallet.write().await = wallet;

        log::info!(
            "Privacy wallet refreshed, balance {} over {} outputs",
            report.balance(),
            report.utxos().len()
        );
        if !report.unresolved().is_empty() {
            log::warn!(
                "{} outputs could not be checked and will be checked again",
                report.unresolved().len()
            );
        }
        Ok(report)
    }

    /// Recent privacy transactions of the wallet, newest first
    pub async fn do_privacy_history(&self) -> TomoLibResult<NormalizedHistoryPage> {
        let wallet = self.wallet_state().await;
        let page = scan_ownership_with_decimals(
            &wallet,
            &self.provider,
            self.config.history_window,
            self.config.privacy_decimals,
        )
        .await?;
        Ok(page)
    }
}
