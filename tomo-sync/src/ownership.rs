//! Resolves which recent chain records belong to the privacy wallet and turns them into history

use std::num::NonZeroU64;

use tomo_units::PRIVACY_DECIMALS;

use crate::error::SyncError;
use crate::primitives::{HistoryEntry, NormalizedHistoryPage, PrivacyWalletState};
use crate::traits::ChainProvider;
use crate::utils::decode_payload;

/// Transaction indices `[last_index - window_size, last_index]`, clipped at zero, newest first.
///
/// History consumers rely on the descending order.
pub fn scan_window(last_index: u64, window_size: NonZeroU64) -> Vec<u64> {
    let first_index = last_index.saturating_sub(window_size.get());
    (first_index..=last_index).rev().collect()
}

/// Scans the most recent `window_size` transaction indices for records addressed to the wallet.
///
/// Amounts are rendered with the privacy asset's decimal places.
pub async fn scan_ownership<P>(
    wallet: &PrivacyWalletState,
    provider: &P,
    window_size: NonZeroU64,
) -> Result<NormalizedHistoryPage, SyncError>
where
    P: ChainProvider,
{
    scan_ownership_with_decimals(wallet, provider, window_size, PRIVACY_DECIMALS).await
}

/// [`scan_ownership`] for an asset with `decimals` decimal places
pub async fn scan_ownership_with_decimals<P>(
    wallet: &PrivacyWalletState,
    provider: &P,
    window_size: NonZeroU64,
    decimals: u32,
) -> Result<NormalizedHistoryPage, SyncError>
where
    P: ChainProvider,
{
    let last_index = provider
        .last_known_index(wallet)
        .await
        .map_err(|e| SyncError::HistoryScanFailed(Box::new(e)))?;
    let window = scan_window(last_index, window_size);
    tracing::info!(
        "Scanning transaction indices {}..={} for privacy history.",
        window.last().copied().unwrap_or(last_index),
        last_index
    );

    let records = provider
        .fetch_records(&window)
        .await
        .map_err(|e| SyncError::HistoryScanFailed(Box::new(e)))?;
    if records.len() != window.len() {
        return Err(SyncError::HistoryScanFailed(
            format!(
                "requested {} records, provider returned {}",
                window.len(),
                records.len()
            )
            .into(),
        ));
    }

    // window order is newest first, every index appears once
    let mut items = Vec::new();
    for (&transaction_index, record) in window.iter().zip(records) {
        let payload = match decode_payload(&record.payload_hex) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Skipping record at index {}. {}", transaction_index, e);
                continue;
            }
        };
        match provider.check_ownership(&record.header, &payload).await {
            Ok(Some(ownership)) => items.push(HistoryEntry::from_ownership(
                transaction_index,
                ownership,
                wallet,
                decimals,
            )),
            Ok(None) => (),
            Err(e) => {
                tracing::warn!(
                    "Ownership check of record at index {} failed, skipping it. {}",
                    transaction_index,
                    e
                );
            }
        }
    }
    tracing::debug!("Found {} privacy transactions.", items.len());

    Ok(NormalizedHistoryPage::single(
        items,
        window.len(),
        wallet.public_address().clone(),
    ))
}
