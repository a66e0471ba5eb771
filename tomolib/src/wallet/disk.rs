//! Reading and writing the privacy wallet snapshot

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{error, warn};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tomo_sync::primitives::PrivacyWalletState;

use crate::error::{TomoLibError, TomoLibResult};

/// Serialized format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of a [`PrivacyWalletState`]
///
/// The balance is stored alongside the outputs for other readers of the file. It is always
/// recomputed from the outputs on load.
#[derive(Debug, Serialize, Deserialize)]
pub struct WalletSnapshot {
    version: u32,
    #[serde(with = "tomo_units::serde_decimal")]
    balance: U256,
    #[serde(flatten)]
    wallet: PrivacyWalletState,
}

impl WalletSnapshot {
    pub fn new(wallet: PrivacyWalletState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            balance: wallet.balance(),
            wallet,
        }
    }

    pub fn into_wallet(self) -> TomoLibResult<PrivacyWalletState> {
        if self.version != SNAPSHOT_VERSION {
            return Err(TomoLibError::SnapshotVersion(self.version));
        }
        if self.balance != self.wallet.balance() {
            warn!(
                "Stored balance {} does not match the stored outputs, using {}",
                self.balance,
                self.wallet.balance()
            );
        }
        Ok(self.wallet)
    }
}

/// Writes `wallet` to `path`. The file is replaced as a whole or not at all.
pub fn write_snapshot(path: &Path, wallet: &PrivacyWalletState) -> TomoLibResult<()> {
    let tmp_path = path.with_extension("json.tmp");
    let result = write_tmp(&tmp_path, wallet).and_then(|()| Ok(fs::rename(&tmp_path, path)?));
    if let Err(e) = &result {
        error!("Couldn't save wallet to {:?}: {}", path, e);
        // leftover temp file is harmless, the next save truncates it
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_tmp(tmp_path: &Path, wallet: &PrivacyWalletState) -> TomoLibResult<()> {
    let mut writer = BufWriter::new(File::create(tmp_path)?);
    serde_json::to_writer_pretty(&mut writer, &WalletSnapshot::new(wallet.clone()))?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Reads the wallet stored at `path`
pub fn read_snapshot(path: &Path) -> TomoLibResult<PrivacyWalletState> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: WalletSnapshot = serde_json::from_reader(reader)?;
    snapshot.into_wallet()
}
