use crate::{
    approve::{Approve, ApproveAction},
    Action, ActionReceipt,
};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;

/// A live contract binding: a wallet-capable provider plus the token and
/// owner it acts for. Absent until the signer, provider and token address
/// are all available.
#[derive(Clone)]
pub struct ContractBinding<P> {
    pub provider: P,
    pub chain_id: u64,
    pub token: Address,
    pub owner: Address,
}

/// Uniform "execute and report outcome" front for the mutating token
/// operations.
///
/// Both operations fail fast, before any network call, when no contract
/// binding is available; that state is expected while prerequisites are
/// still connecting, so the failure is an `Err` outcome, never a panic.
pub struct Dispatcher<P> {
    binding: Option<ContractBinding<P>>,
}

impl<P> Dispatcher<P>
where
    P: Provider + Clone + Send + Sync,
{
    pub const fn new(binding: Option<ContractBinding<P>>) -> Self {
        Self { binding }
    }

    pub const fn disconnected() -> Self {
        Self { binding: None }
    }

    /// Approve `spender` for an exact raw amount.
    pub async fn approve(&self, spender: Address, amount: U256) -> eyre::Result<ActionReceipt> {
        self.action(spender, amount)?.execute().await
    }

    /// Approve `spender` for the maximum representable unsigned 256-bit
    /// amount, the conventional "unlimited" allowance.
    pub async fn approve_infinity(&self, spender: Address) -> eyre::Result<ActionReceipt> {
        self.action(spender, U256::MAX)?.execute().await
    }

    fn action(&self, spender: Address, amount: U256) -> eyre::Result<ApproveAction<P>> {
        let Some(binding) = &self.binding else {
            eyre::bail!("approve unavailable: no contract binding or signer");
        };

        Ok(ApproveAction::new(
            binding.provider.clone(),
            binding.chain_id,
            Approve {
                token: binding.token,
                owner: binding.owner,
                spender,
                amount,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;

    const SPENDER: Address = Address::new([9u8; 20]);

    fn binding() -> ContractBinding<MockProvider> {
        ContractBinding {
            provider: MockProvider,
            chain_id: 1,
            token: Address::from([1u8; 20]),
            owner: Address::from([2u8; 20]),
        }
    }

    #[tokio::test]
    async fn disconnected_approve_fails_fast_without_network() {
        // MockProvider panics on any network access, so an Err here proves
        // the call never left the process.
        let dispatcher: Dispatcher<MockProvider> = Dispatcher::disconnected();

        let result = dispatcher.approve(SPENDER, U256::from(5u64)).await;
        assert!(result.unwrap_err().to_string().contains("unavailable"));
    }

    #[tokio::test]
    async fn disconnected_approve_infinity_fails_fast_without_network() {
        let dispatcher: Dispatcher<MockProvider> = Dispatcher::disconnected();

        let result = dispatcher.approve_infinity(SPENDER).await;
        assert!(result.unwrap_err().to_string().contains("unavailable"));
    }

    #[test]
    fn infinity_builds_the_maximum_raw_amount() {
        let dispatcher = Dispatcher::new(Some(binding()));

        let action = dispatcher.action(SPENDER, U256::MAX).unwrap();
        assert_eq!(action.request().amount, U256::MAX);
        assert_eq!(action.request().spender, SPENDER);
    }

    #[test]
    fn finite_amount_is_passed_through_exactly() {
        let dispatcher = Dispatcher::new(Some(binding()));

        let action = dispatcher.action(SPENDER, U256::from(42u64)).unwrap();
        assert_eq!(action.request().amount, U256::from(42u64));
    }
}
