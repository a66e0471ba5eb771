//! Traits for interfacing the wallet with token contracts

use std::fmt;

use async_trait::async_trait;
use primitive_types::U256;

/// A fee as quoted by a contract or by the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote(pub U256);

impl fmt::Display for FeeQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Handle of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `transfer(recipient, amount)` call of a token contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCall {
    pub contract_address: String,
    pub recipient: String,
    /// base units
    pub amount: U256,
}

/// Sender side options attached to a submitted contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    pub from: String,
    /// Explicit transaction target, `None` lets the client address the contract itself
    pub to: Option<String>,
    pub fee: FeeQuote,
    pub fee_limit: Option<u64>,
}

/// Raw transfer parameters for network fee estimation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxParams {
    pub from: String,
    pub to: String,
    pub value: U256,
}

/// Contract access consumed by [`crate::wallet::send::transfer`].
///
/// Implementations own the ABI encoding, signing and broadcasting.
#[async_trait]
pub trait ContractClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Asks a fee-delegated token contract what it will deduct for `call`
    async fn estimate_fee_delegated(
        &self,
        call: &TokenCall,
        from: &str,
    ) -> Result<FeeQuote, Self::Error>;

    /// Submits `call` to a fee-delegated token contract
    async fn transfer_fee_delegated(
        &self,
        call: &TokenCall,
        options: &SendOptions,
    ) -> Result<TxHash, Self::Error>;

    /// Estimates the native network fee of a plain transfer
    async fn estimate_network_fee(&self, params: &TxParams) -> Result<FeeQuote, Self::Error>;

    /// Submits `call` to a standard token contract, paying the native network fee
    async fn transfer_standard(
        &self,
        call: &TokenCall,
        options: &SendOptions,
    ) -> Result<TxHash, Self::Error>;
}
