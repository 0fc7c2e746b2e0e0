use crate::{Action, ActionReceipt};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::token::IERC20;
use client::fill_transaction;
use tracing::info;

/// Approve input data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approve {
    /// Token contract address
    pub token: Address,
    /// Owner granting the allowance (the transaction sender)
    pub owner: Address,
    /// Spender receiving the allowance
    pub spender: Address,
    /// Raw allowance amount; `U256::MAX` means unlimited by convention
    pub amount: U256,
}

/// Sets an ERC20 allowance.
///
/// Gas, nonce and fee handling go through [`client::fill_transaction`] so
/// the submitted transaction carries the standard gas headroom; signing is
/// the provider's wallet's concern.
pub struct ApproveAction<P> {
    provider: P,
    chain_id: u64,
    request: Approve,
}

impl<P> ApproveAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, chain_id: u64, request: Approve) -> Self {
        Self {
            provider,
            chain_id,
            request,
        }
    }

    pub const fn request(&self) -> &Approve {
        &self.request
    }
}

impl<P> Action for ApproveAction<P>
where
    P: Provider + Clone + Send + Sync,
{
    fn is_ready(&self) -> bool {
        self.request.token != Address::ZERO && self.request.spender != Address::ZERO
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let contract = IERC20::new(self.request.token, &self.provider);
        let current = contract
            .allowance(self.request.owner, self.request.spender)
            .call()
            .await?;

        // A zero-amount approve is a revocation; it is complete only once
        // the allowance actually reads zero.
        if self.request.amount.is_zero() {
            return Ok(current.is_zero());
        }
        Ok(current >= self.request.amount)
    }

    async fn execute(&self) -> eyre::Result<ActionReceipt> {
        if !self.is_ready() {
            eyre::bail!("approve not ready: zero token or spender address");
        }

        let contract = IERC20::new(self.request.token, &self.provider);
        let request = contract
            .approve(self.request.spender, self.request.amount)
            .into_transaction_request();

        let request =
            fill_transaction(request, &self.provider, self.request.owner, self.chain_id).await?;

        let pending = self.provider.send_transaction(request).await?;
        let receipt = pending.get_receipt().await?;

        if !receipt.status() {
            eyre::bail!("approve transaction reverted");
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            spender = %self.request.spender,
            "Allowance approved."
        );

        Ok(ActionReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: Some(U256::from(receipt.gas_used)),
        })
    }

    fn description(&self) -> String {
        if self.request.amount == U256::MAX {
            format!(
                "Approving unlimited spending of {} for {}",
                self.request.token, self.request.spender
            )
        } else {
            format!(
                "Approving {} raw units of {} for {}",
                self.request.amount, self.request.token, self.request.spender
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;

    fn mock_request() -> Approve {
        Approve {
            token: Address::from([1u8; 20]),
            owner: Address::from([2u8; 20]),
            spender: Address::from([3u8; 20]),
            amount: U256::from(1_000_000u64),
        }
    }

    #[test]
    fn test_is_ready_with_valid_request() {
        let action = ApproveAction::new(MockProvider, 1, mock_request());
        assert!(action.is_ready());
    }

    #[test]
    fn test_is_ready_with_zero_spender() {
        let mut request = mock_request();
        request.spender = Address::ZERO;
        let action = ApproveAction::new(MockProvider, 1, request);
        assert!(!action.is_ready());
    }

    #[test]
    fn test_is_ready_with_zero_token() {
        let mut request = mock_request();
        request.token = Address::ZERO;
        let action = ApproveAction::new(MockProvider, 1, request);
        assert!(!action.is_ready());
    }

    #[test]
    fn test_description_finite_amount() {
        let action = ApproveAction::new(MockProvider, 1, mock_request());
        let description = action.description();
        assert!(description.contains("Approving"));
        assert!(description.contains("1000000"));
    }

    #[test]
    fn test_description_unlimited_amount() {
        let mut request = mock_request();
        request.amount = U256::MAX;
        let action = ApproveAction::new(MockProvider, 1, request);
        assert!(action.description().contains("unlimited"));
    }
}
