//! Adapters for the two collaborators of the proxy: the Ethereum validators
//! registry and the Orbs virtual chain.
//!
//! Both are exposed as object-safe async traits so the HTTP layer can be driven
//! by test doubles.

use alloy_primitives::{Bytes, U256};
use async_trait::async_trait;
use orbs_proxy_types::{ValidatorAddress, ValidatorProfile};

pub mod error;
pub mod ethereum_rpc;
pub mod json_structures;
pub mod orbs_rpc;
pub mod retry;

pub use error::{Upstream, UpstreamError};
pub use ethereum_rpc::EthereumRPC;
pub use orbs_rpc::OrbsRPC;

/// Read access to the validators registry contract on Ethereum.
#[async_trait]
pub trait EthereumClient: Send + Sync {
    /// Fails with [`UpstreamError::Reverted`] when the address is not registered.
    async fn get_validator_data(
        &self,
        address: ValidatorAddress,
    ) -> Result<ValidatorProfile, UpstreamError>;
}

/// Read access to the elections contract of an Orbs virtual chain.
#[async_trait]
pub trait OrbsClient: Send + Sync {
    /// Raw concatenation of the elected validators' 20-byte Ethereum addresses.
    async fn get_elected_validators(&self) -> Result<Bytes, UpstreamError>;

    async fn get_validator_stake(&self, address: ValidatorAddress) -> Result<U256, UpstreamError>;

    async fn get_participation_reward(
        &self,
        address: ValidatorAddress,
    ) -> Result<U256, UpstreamError>;

    async fn get_guardian_reward(&self, address: ValidatorAddress) -> Result<U256, UpstreamError>;

    async fn get_validator_reward(&self, address: ValidatorAddress) -> Result<U256, UpstreamError>;
}
