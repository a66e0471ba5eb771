//! Reconciles the privacy wallet's outputs with the chain

use std::collections::BTreeMap;

use futures::future::join_all;
use getset::{CopyGetters, Getters};
use primitive_types::U256;

use crate::error::SyncError;
use crate::primitives::{PrivacyWalletState, Utxo};
use crate::traits::ChainProvider;

/// Summary of a successful reconciliation as reported to the application
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct ReconcileReport {
    /// Privacy balance in base units
    #[getset(get_copy = "pub")]
    balance: U256,
    /// Non-privacy balance, passed through untouched
    #[getset(get_copy = "pub")]
    main_balance: U256,
    /// Outputs retained after the pass, in id order
    #[getset(get = "pub")]
    utxos: Vec<Utxo>,
    /// Outputs whose spent check failed. They were kept and will be checked again on the next
    /// pass.
    #[getset(get = "pub")]
    unresolved: Vec<u64>,
}

/// New wallet state together with its report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Replaces the caller's wallet state as a whole
    pub wallet: PrivacyWalletState,
    #[allow(missing_docs)]
    pub report: ReconcileReport,
}

/// Scans for new outputs and drops those that have been spent since the last pass.
///
/// `wallet` is never modified, the caller swaps in [`Reconciliation::wallet`] on success. Passes
/// over the same wallet must be serialized by the caller.
pub async fn reconcile<P>(
    wallet: &PrivacyWalletState,
    provider: &P,
    main_balance: U256,
) -> Result<Reconciliation, SyncError>
where
    P: ChainProvider,
{
    tracing::info!("Reconciling privacy wallet...");

    let delta = provider
        .scan(wallet)
        .await
        .map_err(|e| SyncError::ScanFailed(Box::new(e)))?;

    let mut updated = wallet.clone();
    let discovered = updated.merge(delta);
    tracing::debug!("Scan discovered {} new outputs.", discovered);

    // outputs already flagged as spent are dropped without asking the chain
    let held = updated.unspent_utxos().cloned().collect::<Vec<_>>();
    let checked = held.len();
    let checks = join_all(held.iter().map(|utxo| provider.is_spent(utxo))).await;

    let mut retained = BTreeMap::new();
    let mut unresolved = Vec::new();
    let mut last_error = None;
    // join_all yields results in input order
    for (utxo, check) in held.into_iter().zip(checks) {
        match check {
            Ok(false) => {
                retained.insert(utxo.id(), utxo);
            }
            Ok(true) => {
                tracing::debug!("Output {} has been spent.", utxo.id());
            }
            Err(e) => {
                tracing::warn!(
                    "Spent check for output {} failed, keeping it until the next pass. {}",
                    utxo.id(),
                    e
                );
                unresolved.push(utxo.id());
                retained.insert(utxo.id(), utxo);
                last_error = Some(e);
            }
        }
    }

    if let Some(e) = last_error {
        if unresolved.len() == checked {
            return Err(SyncError::SpentCheckFailed {
                failed: checked,
                source: Box::new(e),
            });
        }
    }

    updated.replace_utxos(retained);
    let report = ReconcileReport {
        balance: updated.balance(),
        main_balance,
        utxos: updated.utxos().values().cloned().collect(),
        unresolved,
    };
    tracing::info!(
        "Reconciled privacy wallet. {} outputs, balance {}.",
        report.utxos.len(),
        report.balance
    );

    Ok(Reconciliation {
        wallet: updated,
        report,
    })
}
