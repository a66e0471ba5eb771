//! Module for primitive structs associated with the sync engine

use std::collections::BTreeMap;

use getset::{CopyGetters, Getters};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A discrete spendable value owned by the privacy wallet
///
/// `amount` never changes once created and `spent` only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct Utxo {
    /// Index of the output on chain, unique within a wallet
    #[getset(get_copy = "pub")]
    id: u64,
    /// Value in base units
    #[getset(get_copy = "pub")]
    #[serde(with = "tomo_units::serde_decimal")]
    amount: U256,
    #[getset(get_copy = "pub")]
    spent: bool,
    /// Provider specific data needed to spend or re-check the output
    #[getset(get = "pub")]
    #[serde(with = "hex::serde")]
    owner_metadata: Vec<u8>,
}

impl Utxo {
    /// Creates a new unspent output
    pub fn from_parts(id: u64, amount: U256, owner_metadata: Vec<u8>) -> Self {
        Self {
            id,
            amount,
            spent: false,
            owner_metadata,
        }
    }

    /// Flags the output as spent. There is no way back.
    pub fn mark_spent(&mut self) {
        self.spent = true;
    }
}

/// Outputs discovered by [`crate::traits::ChainProvider::scan`].
///
/// The provider never touches the wallet directly, the engine merges the delta into a copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanDelta {
    /// Every output the provider currently attributes to the wallet
    pub utxos: Vec<Utxo>,
    /// Replacement for the provider's opaque wallet state, `None` keeps the current one
    pub provider_state: Option<Vec<u8>>,
}

/// Privacy wallet data owned by the sync engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct PrivacyWalletState {
    /// The wallet's main (public ledger) address
    address: String,
    /// The privacy address outputs are sent to
    public_address: String,
    #[serde(with = "utxo_set")]
    utxos: BTreeMap<u64, Utxo>,
    /// Opaque to this crate, only ever replaced through a [`ScanDelta`]
    #[serde(with = "hex::serde", default)]
    provider_state: Vec<u8>,
}

impl PrivacyWalletState {
    /// Creates an empty wallet
    pub fn new(address: impl Into<String>, public_address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            public_address: public_address.into(),
            utxos: BTreeMap::new(),
            provider_state: Vec::new(),
        }
    }

    /// Creates a wallet holding `utxos`. Later duplicates of an id are ignored.
    pub fn from_parts(
        address: impl Into<String>,
        public_address: impl Into<String>,
        utxos: impl IntoIterator<Item = Utxo>,
        provider_state: Vec<u8>,
    ) -> Self {
        let mut wallet = Self::new(address, public_address);
        for utxo in utxos {
            wallet.utxos.entry(utxo.id()).or_insert(utxo);
        }
        wallet.provider_state = provider_state;
        wallet
    }

    /// Sum of all unspent amounts, always derived from the output set
    pub fn balance(&self) -> U256 {
        self.unspent_utxos()
            .fold(U256::zero(), |total, utxo| total.saturating_add(utxo.amount()))
    }

    /// Unspent outputs in id order
    pub fn unspent_utxos(&self) -> impl Iterator<Item = &Utxo> {
        self.utxos.values().filter(|utxo| !utxo.spent())
    }

    /// Merges a scan delta and returns how many outputs were new.
    ///
    /// Known outputs keep their amount and metadata, a spent flag reported by the provider is
    /// carried over.
    pub(crate) fn merge(&mut self, delta: ScanDelta) -> usize {
        let ScanDelta {
            utxos,
            provider_state,
        } = delta;

        let mut discovered = 0;
        for utxo in utxos {
            match self.utxos.get_mut(&utxo.id()) {
                Some(known) => {
                    if utxo.spent() {
                        known.mark_spent();
                    }
                }
                None => {
                    self.utxos.insert(utxo.id(), utxo);
                    discovered += 1;
                }
            }
        }
        if let Some(provider_state) = provider_state {
            self.provider_state = provider_state;
        }

        discovered
    }

    pub(crate) fn replace_utxos(&mut self, utxos: BTreeMap<u64, Utxo>) {
        self.utxos = utxos;
    }
}

// the output set is persisted as a list, ids are re-derived from the outputs themselves
mod utxo_set {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::Utxo;

    pub(super) fn serialize<S: Serializer>(
        utxos: &BTreeMap<u64, Utxo>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(utxos.values())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u64, Utxo>, D::Error> {
        let utxos = Vec::<Utxo>::deserialize(deserializer)?;
        let mut set = BTreeMap::new();
        for utxo in utxos {
            set.entry(utxo.id()).or_insert(utxo);
        }
        Ok(set)
    }
}

/// Decoded content of a chain record addressed to the wallet
///
/// Carries no position, the engine knows which transaction index it asked about.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct OwnershipRecord {
    /// Value in base units
    #[getset(get_copy = "pub")]
    amount: U256,
    #[getset(get = "pub")]
    receiver_address: String,
    /// Unix timestamp
    #[getset(get_copy = "pub")]
    created_at: u64,
    #[getset(get = "pub")]
    sender_hint_address: String,
}

impl OwnershipRecord {
    /// Creates an ownership record from parts
    pub fn from_parts(
        amount: U256,
        receiver_address: impl Into<String>,
        created_at: u64,
        sender_hint_address: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            receiver_address: receiver_address.into(),
            created_at,
            sender_hint_address: sender_hint_address.into(),
        }
    }
}

/// A raw chain record as returned by a batched fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<H> {
    /// Provider specific record header
    pub header: H,
    /// Payload as a sequence of `0x`-prefixed hex bytes
    pub payload_hex: Vec<String>,
}

/// Direction of a history entry from the point of view of the privacy wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Received from the wallet's main address
    Incoming,
    /// Sent from the privacy address to someone else
    Outgoing,
}

/// One row of privacy transaction history
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[getset(get_copy = "pub")]
    transaction_index: u64,
    /// Unix timestamp
    #[getset(get_copy = "pub")]
    created_time: u64,
    #[getset(get_copy = "pub")]
    direction: Direction,
    #[getset(get = "pub")]
    from: String,
    #[getset(get = "pub")]
    to: String,
    /// Decimal amount
    #[getset(get = "pub")]
    amount: String,
}

impl HistoryEntry {
    /// Derives the direction of the record found at `transaction_index` relative to `wallet` and
    /// renders its amount with `decimals` places
    pub fn from_ownership(
        transaction_index: u64,
        record: OwnershipRecord,
        wallet: &PrivacyWalletState,
        decimals: u32,
    ) -> Self {
        let amount = tomo_units::from_base_units(record.amount(), decimals);
        let OwnershipRecord {
            receiver_address,
            created_at,
            ..
        } = record;

        let (direction, from) = if &receiver_address == wallet.public_address() {
            (Direction::Incoming, wallet.address().clone())
        } else {
            (Direction::Outgoing, wallet.public_address().clone())
        };

        Self {
            transaction_index,
            created_time: created_at,
            direction,
            from,
            to: receiver_address,
            amount,
        }
    }
}

/// A page of history as presented to the application
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct NormalizedHistoryPage {
    /// Newest first
    #[getset(get = "pub")]
    items: Vec<HistoryEntry>,
    #[getset(get_copy = "pub")]
    current_page: u32,
    /// Number of transaction indices the scan covered, not the number of items
    #[getset(get_copy = "pub")]
    total_count: usize,
    #[getset(get_copy = "pub")]
    page_count: u32,
    /// The privacy address the history belongs to
    #[getset(get = "pub")]
    address: String,
}

impl NormalizedHistoryPage {
    /// A page holding the complete result of a scan over `scanned` transaction indices
    pub fn single(items: Vec<HistoryEntry>, scanned: usize, address: impl Into<String>) -> Self {
        Self {
            total_count: scanned,
            items,
            current_page: 1,
            page_count: 1,
            address: address.into(),
        }
    }
}
