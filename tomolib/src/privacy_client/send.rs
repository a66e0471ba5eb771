//! Token transfers

use tomo_sync::ChainProvider;

use super::PrivacyClient;
use crate::error::TomoLibResult;
use crate::wallet::send::{transfer, TransferRequest};
use crate::wallet::traits::{ContractClient, TxHash};

impl<P, C> PrivacyClient<P, C>
where
    P: ChainProvider,
    C: ContractClient,
{
    /// Submits `request`. Transfers don't touch the privacy wallet and may run concurrently.
    pub async fn do_send(&self, request: TransferRequest) -> TomoLibResult<TxHash> {
        Ok(transfer(request, &self.contracts, self.config.standard_fee_limit).await?)
    }
}
