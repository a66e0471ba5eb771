//! Deterministic chain provider for tests
//!
//! Every chain answer is configured up front through builder methods, every call is counted.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::primitives::{OwnershipRecord, PrivacyWalletState, RawRecord, ScanDelta, Utxo};
use crate::traits::ChainProvider;
use crate::utils::encode_payload;

macro_rules! build_method {
    ($name:ident, $localtype:ty) => {
        #[doc = concat!("Set the `", stringify!($name), "` field of the mock.")]
        pub fn $name(mut self, $name: $localtype) -> Self {
            self.$name = $name;
            self
        }
    };
}
macro_rules! build_method_insert {
    ($name:ident, $field:ident, $localtype:ty) => {
        #[doc = concat!("Add an entry to the `", stringify!($field), "` of the mock.")]
        pub fn $name(mut self, $name: $localtype) -> Self {
            self.$field.insert($name);
            self
        }
    };
}

/// Error returned by every failing [`MockChain`] call
#[derive(Debug, thiserror::Error)]
#[error("mock chain: {0}")]
pub struct MockChainError(pub &'static str);

/// Header of a [`MockChain`] record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockHeader {
    /// Index the record was fetched for
    pub transaction_index: u64,
}

/// Payload the mock stores for the record at `transaction_index`
pub fn mock_payload(transaction_index: u64) -> Vec<u8> {
    transaction_index.to_be_bytes().to_vec()
}

/// A chain where every transaction index not marked missing has a record and ownership is
/// configured explicitly
#[derive(Debug, Default)]
pub struct MockChain {
    discovered: Vec<Utxo>,
    provider_state: Option<Vec<u8>>,
    fail_scan: bool,
    spent: HashSet<u64>,
    failing_spent_checks: HashSet<u64>,
    spent_check_delay: Option<Duration>,
    last_index: u64,
    fail_last_index: bool,
    fail_fetch: bool,
    owned: BTreeMap<u64, OwnershipRecord>,
    corrupt_payloads: HashSet<u64>,
    missing_records: HashSet<u64>,
    failing_ownership_checks: HashSet<u64>,
    scans: AtomicUsize,
    spent_checks: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetched_windows: Mutex<Vec<Vec<u64>>>,
}

impl MockChain {
    build_method!(fail_scan, bool);
    build_method!(last_index, u64);
    build_method!(fail_last_index, bool);
    build_method!(fail_fetch, bool);
    build_method_insert!(spent, spent, u64);
    build_method_insert!(failing_spent_check, failing_spent_checks, u64);
    build_method_insert!(corrupt_payload, corrupt_payloads, u64);
    build_method_insert!(missing_record, missing_records, u64);
    build_method_insert!(failing_ownership_check, failing_ownership_checks, u64);

    /// Output returned by every scan
    pub fn discovered(mut self, utxo: Utxo) -> Self {
        self.discovered.push(utxo);
        self
    }

    /// Provider state returned by every scan
    pub fn provider_state(mut self, provider_state: Vec<u8>) -> Self {
        self.provider_state = Some(provider_state);
        self
    }

    /// Every spent check sleeps for `delay` before answering
    pub fn spent_check_delay(mut self, delay: Duration) -> Self {
        self.spent_check_delay = Some(delay);
        self
    }

    /// Marks the record at `transaction_index` as addressed to the wallet
    pub fn owned(mut self, transaction_index: u64, ownership: OwnershipRecord) -> Self {
        self.owned.insert(transaction_index, ownership);
        self
    }

    /// Number of scans so far
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Number of spent checks so far
    pub fn spent_checks(&self) -> usize {
        self.spent_checks.load(Ordering::SeqCst)
    }

    /// Highest number of spent checks that were in flight at the same time
    pub fn max_concurrent_spent_checks(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Index windows requested through `fetch_records`, in call order
    pub fn fetched_windows(&self) -> Vec<Vec<u64>> {
        self.fetched_windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChainProvider for MockChain {
    type Header = MockHeader;
    type Error = MockChainError;

    async fn scan(&self, _wallet: &PrivacyWalletState) -> Result<ScanDelta, Self::Error> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if self.fail_scan {
            return Err(MockChainError("scan rejected"));
        }
        Ok(ScanDelta {
            utxos: self.discovered.clone(),
            provider_state: self.provider_state.clone(),
        })
    }

    async fn is_spent(&self, utxo: &Utxo) -> Result<bool, Self::Error> {
        self.spent_checks.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if let Some(delay) = self.spent_check_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_spent_checks.contains(&utxo.id()) {
            return Err(MockChainError("spent check timed out"));
        }
        Ok(self.spent.contains(&utxo.id()))
    }

    async fn last_known_index(&self, _wallet: &PrivacyWalletState) -> Result<u64, Self::Error> {
        if self.fail_last_index {
            return Err(MockChainError("last index unavailable"));
        }
        Ok(self.last_index)
    }

    async fn fetch_records(
        &self,
        indices: &[u64],
    ) -> Result<Vec<RawRecord<Self::Header>>, Self::Error> {
        self.fetched_windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(indices.to_vec());
        if self.fail_fetch {
            return Err(MockChainError("batch fetch rejected"));
        }

        Ok(indices
            .iter()
            .filter(|transaction_index| !self.missing_records.contains(transaction_index))
            .map(|&transaction_index| RawRecord {
                header: MockHeader { transaction_index },
                payload_hex: if self.corrupt_payloads.contains(&transaction_index) {
                    vec!["0xzz".to_string()]
                } else {
                    encode_payload(&mock_payload(transaction_index))
                },
            })
            .collect())
    }

    async fn check_ownership(
        &self,
        header: &Self::Header,
        payload: &[u8],
    ) -> Result<Option<OwnershipRecord>, Self::Error> {
        if self.failing_ownership_checks.contains(&header.transaction_index) {
            return Err(MockChainError("ownership check failed"));
        }
        if payload != mock_payload(header.transaction_index).as_slice() {
            return Err(MockChainError("payload does not belong to header"));
        }
        Ok(self.owned.get(&header.transaction_index).cloned())
    }
}
