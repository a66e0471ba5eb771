use std::sync::Mutex;

use async_trait::async_trait;
use primitive_types::U256;
use tomo_sync::mocks::MockChain;
use tomo_sync::primitives::{Direction, OwnershipRecord, PrivacyWalletState, Utxo};
use tomoconfig::{ChainType, TomoConfig};
use tomolib::error::TomoLibError;
use tomolib::privacy_client::PrivacyClient;
use tomolib::wallet::send::{errors::TransferError, TokenStandard, TransferRequest};
use tomolib::wallet::traits::{ContractClient, FeeQuote, SendOptions, TokenCall, TxHash, TxParams};

#[derive(Debug, thiserror::Error)]
#[error("contract unavailable")]
struct Unreachable;

/// Accepts every transfer and remembers the submitted amounts
#[derive(Default)]
struct RecordingContract {
    submitted: Mutex<Vec<U256>>,
}

#[async_trait]
impl ContractClient for RecordingContract {
    type Error = Unreachable;

    async fn estimate_fee_delegated(
        &self,
        _call: &TokenCall,
        _from: &str,
    ) -> Result<FeeQuote, Self::Error> {
        Ok(FeeQuote(U256::from(1u64)))
    }

    async fn transfer_fee_delegated(
        &self,
        call: &TokenCall,
        _options: &SendOptions,
    ) -> Result<TxHash, Self::Error> {
        self.submitted.lock().unwrap().push(call.amount);
        Ok(TxHash(format!("0xdelegated{}", call.amount)))
    }

    async fn estimate_network_fee(&self, _params: &TxParams) -> Result<FeeQuote, Self::Error> {
        Err(Unreachable)
    }

    async fn transfer_standard(
        &self,
        _call: &TokenCall,
        _options: &SendOptions,
    ) -> Result<TxHash, Self::Error> {
        Err(Unreachable)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn config(dir: &tempfile::TempDir) -> TomoConfig {
    TomoConfig::create_unconnected(ChainType::Testnet, Some(dir.path().to_path_buf()))
}

fn wallet() -> PrivacyWalletState {
    PrivacyWalletState::from_parts(
        "0xmain",
        "privacy",
        [
            Utxo::from_parts(1, U256::from(1_000_000_000u64), vec![1]),
            Utxo::from_parts(2, U256::from(500_000_000u64), vec![2]),
        ],
        Vec::new(),
    )
}

#[tokio::test]
async fn refresh_persists_reconciled_wallet() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let chain = MockChain::default()
        .spent(1)
        .discovered(Utxo::from_parts(3, U256::from(250_000_000u64), vec![3]));
    let client = PrivacyClient::create_from_wallet(
        wallet(),
        config(&dir),
        chain,
        RecordingContract::default(),
    );

    let report = client.do_refresh_privacy(U256::from(42u64)).await.unwrap();

    assert_eq!(report.balance(), U256::from(750_000_000u64));
    assert_eq!(report.main_balance(), U256::from(42u64));
    assert_eq!(client.privacy_balance().await, U256::from(750_000_000u64));

    let reloaded = PrivacyClient::load_from_disk(
        config(&dir),
        MockChain::default(),
        RecordingContract::default(),
    )
    .unwrap();
    assert_eq!(reloaded.wallet_state().await, client.wallet_state().await);
}

#[tokio::test]
async fn failed_refresh_changes_nothing() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let client = PrivacyClient::create_from_wallet(
        wallet(),
        config(&dir),
        MockChain::default().failing_spent_check(1).failing_spent_check(2),
        RecordingContract::default(),
    );

    let result = client.do_refresh_privacy(U256::zero()).await;

    assert!(matches!(result, Err(TomoLibError::Sync(_))));
    assert_eq!(client.wallet_state().await, wallet());
    assert!(!client.config().wallet_exists());
}

#[tokio::test]
async fn concurrent_refreshes_are_serialized() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let client = PrivacyClient::create_from_wallet(
        wallet(),
        config(&dir),
        MockChain::default().spent(2),
        RecordingContract::default(),
    );

    let (first, second) = tokio::join!(
        client.do_refresh_privacy(U256::zero()),
        client.do_refresh_privacy(U256::zero())
    );

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(client.privacy_balance().await, U256::from(1_000_000_000u64));
}

#[tokio::test]
async fn history_uses_configured_window() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir);
    config.history_window = std::num::NonZeroU64::new(10).unwrap();
    let chain = MockChain::default()
        .last_index(100)
        .owned(
            95,
            OwnershipRecord::from_parts(U256::from(2_000_000_000u64), "privacy", 1_600_000_000, ""),
        )
        .owned(
            80,
            OwnershipRecord::from_parts(U256::from(1u64), "privacy", 1_500_000_000, ""),
        );
    let client =
        PrivacyClient::create_from_wallet(wallet(), config, chain, RecordingContract::default());

    let page = client.do_privacy_history().await.unwrap();

    assert_eq!(page.items().len(), 1);
    assert_eq!(page.items()[0].transaction_index(), 95);
    assert_eq!(page.total_count(), 11);
    assert_eq!(page.items()[0].direction(), Direction::Incoming);
    assert_eq!(page.items()[0].amount(), "2");
}

#[tokio::test]
async fn send_goes_through_the_contract_client() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let client = PrivacyClient::create_from_wallet(
        wallet(),
        config(&dir),
        MockChain::default(),
        RecordingContract::default(),
    );

    let tx_hash = client
        .do_send(TransferRequest::new(
            "0.5",
            "trc21".parse::<TokenStandard>().unwrap(),
            "0xtoken",
            18,
            "0xmain",
            "0xfriend",
        ))
        .await
        .unwrap();
    assert_eq!(tx_hash.to_string(), "0xdelegated500000000000000000");

    let failed = client
        .do_send(TransferRequest::new(
            "1",
            TokenStandard::Standard,
            "0xtoken",
            18,
            "0xmain",
            "0xfriend",
        ))
        .await;
    assert!(matches!(
        failed,
        Err(TomoLibError::Transfer(TransferError::TransferFailed { .. }))
    ));
    assert_eq!(client.wallet_state().await, wallet());
}
