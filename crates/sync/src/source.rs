use crate::TokenSource;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::token::IERC20;
use events::{EventHub, SourceId};
use eyre::Result;
use tracing::debug;

/// Token source backed by a JSON-RPC provider.
///
/// Batched reads go through the Multicall3 aggregator so each poll costs a
/// single network round trip; the on-demand allowance read is a plain call.
pub struct RpcTokenSource<P> {
    provider: P,
    token: Address,
    hub: EventHub,
}

impl<P> RpcTokenSource<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, token: Address, account: Option<Address>) -> Self {
        let hub = EventHub::new(SourceId {
            address: token,
            account,
        });
        Self {
            provider,
            token,
            hub,
        }
    }

    pub const fn token(&self) -> Address {
        self.token
    }
}

impl<P> TokenSource for RpcTokenSource<P>
where
    P: Provider + Clone,
{
    fn id(&self) -> SourceId {
        self.hub.id()
    }

    async fn total_supply(&self) -> Result<(U256, u8)> {
        debug!(token = %self.token, "querying total supply");

        let contract = IERC20::new(self.token, &self.provider);
        let (supply, decimals) = self
            .provider
            .multicall()
            .add(contract.totalSupply())
            .add(contract.decimals())
            .aggregate()
            .await?;

        Ok((supply, decimals))
    }

    async fn balance_of(&self, account: Address) -> Result<(U256, u8)> {
        debug!(token = %self.token, account = %account, "querying balance");

        let contract = IERC20::new(self.token, &self.provider);
        let (balance, decimals) = self
            .provider
            .multicall()
            .add(contract.balanceOf(account))
            .add(contract.decimals())
            .aggregate()
            .await?;

        Ok((balance, decimals))
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        debug!(token = %self.token, owner = %owner, spender = %spender, "querying allowance");

        let contract = IERC20::new(self.token, &self.provider);
        let allowance = contract.allowance(owner, spender).call().await?;

        Ok(allowance)
    }

    fn events(&self) -> &EventHub {
        &self.hub
    }
}
