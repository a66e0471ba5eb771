//! Builds and submits token transfers for both token standards

use std::fmt;
use std::str::FromStr;

use getset::{CopyGetters, Getters};
use primitive_types::U256;
use tomo_units::{to_base_units, AmountError};

use crate::wallet::traits::{ContractClient, SendOptions, TokenCall, TxHash, TxParams};

use self::errors::{TransferError, TransferStage};

pub mod errors;

/// Who pays for a token transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenStandard {
    /// TRC20. The sender pays the native network fee.
    Standard,
    /// TRC21. The contract deducts its fee from the transferred token.
    FeeDelegated,
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenStandard::Standard => "TRC20",
            TokenStandard::FeeDelegated => "TRC21",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TokenStandard {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRC20" | "STANDARD" => Ok(TokenStandard::Standard),
            "TRC21" | "FEE_DELEGATED" => Ok(TokenStandard::FeeDelegated),
            _ => Err(TransferError::InvalidTokenStandard(s.to_string())),
        }
    }
}

/// A single token transfer as entered by the user. Consumed by [`transfer`].
#[derive(Debug, PartialEq, Eq, Getters, CopyGetters)]
pub struct TransferRequest {
    /// Amount as a decimal string in token units
    #[getset(get = "pub")]
    amount_decimal: String,
    #[getset(get_copy = "pub")]
    token_standard: TokenStandard,
    #[getset(get = "pub")]
    contract_address: String,
    /// Decimal places of the token
    #[getset(get_copy = "pub")]
    decimals: u32,
    #[getset(get = "pub")]
    from: String,
    #[getset(get = "pub")]
    to: String,
}

impl TransferRequest {
    pub fn new(
        amount_decimal: impl Into<String>,
        token_standard: TokenStandard,
        contract_address: impl Into<String>,
        decimals: u32,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            amount_decimal: amount_decimal.into(),
            token_standard,
            contract_address: contract_address.into(),
            decimals,
            from: from.into(),
            to: to.into(),
        }
    }

    /// The amount in base units. Zero is rejected, a transfer must move something.
    pub fn base_units(&self) -> Result<U256, AmountError> {
        let amount = to_base_units(&self.amount_decimal, self.decimals)?;
        if amount.is_zero() {
            return Err(AmountError::Zero);
        }
        Ok(amount)
    }
}

/// Computes the base unit amount, quotes the fee the way `request`'s token standard demands and
/// submits the transfer.
///
/// `fee_limit` is the gas ceiling attached to standard transfers. Fee-delegated transfers ignore
/// it.
pub async fn transfer<C>(
    request: TransferRequest,
    client: &C,
    fee_limit: u64,
) -> Result<TxHash, TransferError>
where
    C: ContractClient,
{
    let amount = request.base_units()?;
    let TransferRequest {
        token_standard,
        contract_address,
        from,
        to,
        ..
    } = request;
    log::info!(
        "Sending {} base units of {} token {} to {}",
        amount,
        token_standard,
        contract_address,
        to
    );

    let call = TokenCall {
        contract_address,
        recipient: to,
        amount,
    };
    let tx_hash = match token_standard {
        TokenStandard::FeeDelegated => {
            let fee = client
                .estimate_fee_delegated(&call, &from)
                .await
                .map_err(TransferError::failed_at(TransferStage::FeeEstimation))?;
            log::debug!("Contract quoted a fee of {}", fee);
            let options = SendOptions {
                from,
                to: None,
                fee,
                fee_limit: None,
            };
            client
                .transfer_fee_delegated(&call, &options)
                .await
                .map_err(TransferError::failed_at(TransferStage::Submission))?
        }
        TokenStandard::Standard => {
            let params = TxParams {
                from: from.clone(),
                to: call.recipient.clone(),
                value: call.amount,
            };
            let fee = client
                .estimate_network_fee(&params)
                .await
                .map_err(TransferError::failed_at(TransferStage::FeeEstimation))?;
            log::debug!("Network fee estimated at {}", fee);
            let options = SendOptions {
                from,
                to: Some(call.contract_address.clone()),
                fee,
                fee_limit: Some(fee_limit),
            };
            client
                .transfer_standard(&call, &options)
                .await
                .map_err(TransferError::failed_at(TransferStage::Submission))?
        }
    };

    log::info!("Transfer submitted: {}", tx_hash);
    Ok(tx_hash)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use test_case::test_case;

    use super::*;
    use crate::wallet::traits::FeeQuote;

    #[derive(Debug, thiserror::Error)]
    #[error("contract: {0}")]
    struct MockContractError(&'static str);

    #[derive(Default)]
    struct MockContract {
        fail_estimation: bool,
        fail_submission: bool,
        fee_delegated_estimates: AtomicUsize,
        network_estimates: AtomicUsize,
        submissions: Mutex<Vec<(TokenCall, SendOptions)>>,
        estimated_params: Mutex<Vec<TxParams>>,
    }

    impl MockContract {
        fn estimation_result(&self) -> Result<FeeQuote, MockContractError> {
            if self.fail_estimation {
                return Err(MockContractError("estimation rejected"));
            }
            Ok(FeeQuote(U256::from(21_000u64)))
        }

        fn submit(
            &self,
            call: &TokenCall,
            options: &SendOptions,
        ) -> Result<TxHash, MockContractError> {
            if self.fail_submission {
                return Err(MockContractError("submission rejected"));
            }
            self.submissions
                .lock()
                .unwrap()
                .push((call.clone(), options.clone()));
            Ok(TxHash("0xfeed".to_string()))
        }

        fn submissions(&self) -> Vec<(TokenCall, SendOptions)> {
            self.submissions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContractClient for MockContract {
        type Error = MockContractError;

        async fn estimate_fee_delegated(
            &self,
            _call: &TokenCall,
            _from: &str,
        ) -> Result<FeeQuote, Self::Error> {
            self.fee_delegated_estimates.fetch_add(1, Ordering::SeqCst);
            self.estimation_result()
        }

        async fn transfer_fee_delegated(
            &self,
            call: &TokenCall,
            options: &SendOptions,
        ) -> Result<TxHash, Self::Error> {
            self.submit(call, options)
        }

        async fn estimate_network_fee(&self, params: &TxParams) -> Result<FeeQuote, Self::Error> {
            self.network_estimates.fetch_add(1, Ordering::SeqCst);
            self.estimated_params.lock().unwrap().push(params.clone());
            self.estimation_result()
        }

        async fn transfer_standard(
            &self,
            call: &TokenCall,
            options: &SendOptions,
        ) -> Result<TxHash, Self::Error> {
            self.submit(call, options)
        }
    }

    fn request(amount: &str, token_standard: TokenStandard) -> TransferRequest {
        TransferRequest::new(amount, token_standard, "0xtoken", 9, "0xalice", "0xbob")
    }

    #[test_case("TRC20" => TokenStandard::Standard ; "trc20")]
    #[test_case("standard" => TokenStandard::Standard ; "standard lowercase")]
    #[test_case("trc21" => TokenStandard::FeeDelegated ; "trc21 lowercase")]
    #[test_case("FEE_DELEGATED" => TokenStandard::FeeDelegated ; "fee delegated")]
    fn token_standard_parses(tag: &str) -> TokenStandard {
        tag.parse().unwrap()
    }

    #[test]
    fn unknown_token_standard_is_rejected() {
        assert!(matches!(
            "TRC721".parse::<TokenStandard>(),
            Err(TransferError::InvalidTokenStandard(tag)) if tag == "TRC721"
        ));
    }

    #[tokio::test]
    async fn fee_delegated_transfer_never_estimates_network_fee() {
        let contract = MockContract::default();

        let tx_hash = transfer(request("1.5", TokenStandard::FeeDelegated), &contract, 50_000)
            .await
            .unwrap();

        assert_eq!(tx_hash, TxHash("0xfeed".to_string()));
        assert_eq!(contract.fee_delegated_estimates.load(Ordering::SeqCst), 1);
        assert_eq!(contract.network_estimates.load(Ordering::SeqCst), 0);
        let (call, options) = contract.submissions().remove(0);
        assert_eq!(call.amount, U256::from(1_500_000_000u64));
        assert_eq!(call.recipient, "0xbob");
        assert_eq!(options.to, None);
        assert_eq!(options.fee_limit, None);
        assert_eq!(options.fee, FeeQuote(U256::from(21_000u64)));
    }

    #[tokio::test]
    async fn standard_transfer_never_asks_the_contract_for_a_fee() {
        let contract = MockContract::default();

        transfer(request("2", TokenStandard::Standard), &contract, 50_000)
            .await
            .unwrap();

        assert_eq!(contract.fee_delegated_estimates.load(Ordering::SeqCst), 0);
        assert_eq!(contract.network_estimates.load(Ordering::SeqCst), 1);
        assert_eq!(
            contract.estimated_params.lock().unwrap().clone(),
            vec![TxParams {
                from: "0xalice".to_string(),
                to: "0xbob".to_string(),
                value: U256::from(2_000_000_000u64),
            }]
        );
        let (call, options) = contract.submissions().remove(0);
        assert_eq!(call.contract_address, "0xtoken");
        assert_eq!(options.from, "0xalice");
        assert_eq!(options.to.as_deref(), Some("0xtoken"));
        assert_eq!(options.fee_limit, Some(50_000));
    }

    #[test_case("0" ; "zero")]
    #[test_case("0.000" ; "zero with fraction")]
    #[test_case("-1" ; "negative")]
    #[test_case("1,5" ; "comma")]
    #[test_case("0.0000000001" ; "below base unit")]
    fn invalid_amounts_never_reach_the_contract(amount: &str) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let contract = MockContract::default();

        let result = runtime.block_on(transfer(
            request(amount, TokenStandard::Standard),
            &contract,
            50_000,
        ));

        assert!(matches!(result, Err(TransferError::InvalidAmount(_))));
        assert_eq!(contract.network_estimates.load(Ordering::SeqCst), 0);
        assert!(contract.submissions().is_empty());
    }

    #[tokio::test]
    async fn estimation_failure_is_reported_with_its_stage() {
        let contract = MockContract {
            fail_estimation: true,
            ..Default::default()
        };

        let error = transfer(request("1", TokenStandard::FeeDelegated), &contract, 50_000)
            .await
            .unwrap_err();

        assert_eq!(error.stage(), Some(TransferStage::FeeEstimation));
        assert!(contract.submissions().is_empty());
    }

    #[tokio::test]
    async fn submission_failure_is_reported_with_its_stage() {
        let contract = MockContract {
            fail_submission: true,
            ..Default::default()
        };

        let error = transfer(request("1", TokenStandard::Standard), &contract, 50_000)
            .await
            .unwrap_err();

        assert_eq!(error.stage(), Some(TransferStage::Submission));
        assert!(error.to_string().contains("submission rejected"));
    }
}
