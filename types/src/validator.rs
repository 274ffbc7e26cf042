use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::ValidatorAddress;

/// Registry metadata of a validator, as stored in the Ethereum registry contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorProfile {
    pub address: ValidatorAddress,
    pub name: String,
    pub website: String,
    /// Address of the validator's Orbs node
    pub node_address: ValidatorAddress,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("total reward overflows 256 bits")]
pub struct RewardOverflow;

/// Stake and cumulative rewards of a validator, in token base units.
///
/// All amounts serialize as decimal strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardBreakdown {
    #[serde(with = "decimal")]
    pub stake: U256,
    #[serde(with = "decimal")]
    pub participation_reward: U256,
    #[serde(with = "decimal")]
    pub guardian_reward: U256,
    #[serde(with = "decimal")]
    pub validator_reward: U256,
    #[serde(with = "decimal")]
    pub total_reward: U256,
}

impl RewardBreakdown {
    /// Builds the breakdown, computing the total as the exact sum of the three rewards.
    pub fn new(
        stake: U256,
        participation_reward: U256,
        guardian_reward: U256,
        validator_reward: U256,
    ) -> Result<Self, RewardOverflow> {
        let total_reward = participation_reward
            .checked_add(guardian_reward)
            .and_then(|sum| sum.checked_add(validator_reward))
            .ok_or(RewardOverflow)?;

        Ok(Self {
            stake,
            participation_reward,
            guardian_reward,
            validator_reward,
            total_reward,
        })
    }
}

/// Response body of the single elected validator route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidatorDetail {
    #[serde(flatten)]
    pub profile: ValidatorProfile,
    #[serde(flatten)]
    pub rewards: RewardBreakdown,
}

/// Serde adapter rendering a `U256` as a base-10 string.
pub mod decimal {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        U256::from_str_radix(&s, 10).map_err(serde::de::Error::custom)
    }
}
