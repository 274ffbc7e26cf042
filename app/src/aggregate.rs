//! Fan-out over the two collaborators and assembly of the response bodies.

use orbs_proxy_types::{ElectedValidatorSet, RewardBreakdown, ValidatorAddress, ValidatorDetail};
use orbs_proxy_upstream::ethereum_rpc::GET_VALIDATOR_DATA;
use orbs_proxy_upstream::orbs_rpc::{
    GET_ELECTED_VALIDATORS, GET_GUARDIAN_REWARD, GET_PARTICIPATION_REWARD, GET_VALIDATOR_REWARD,
    GET_VALIDATOR_STAKE,
};
use orbs_proxy_upstream::{Upstream, UpstreamError};
use tracing::debug;

use crate::state::AppState;

/// Current elected set, in the order reported by the elections contract.
pub async fn elected_validators(state: &AppState) -> Result<ElectedValidatorSet, UpstreamError> {
    let buffer = state
        .metrics
        .track(
            Upstream::Orbs,
            GET_ELECTED_VALIDATORS,
            state.orbs.get_elected_validators(),
        )
        .await?;

    let elected = ElectedValidatorSet::decode(&buffer)
        .map_err(|e| UpstreamError::malformed(Upstream::Orbs, e))?;

    debug!(count = elected.len(), "decoded elected validators");
    Ok(elected)
}

/// Registry profile merged with stake and cumulative rewards.
///
/// All five reads run concurrently; the first failure aborts the others and
/// no partial detail is produced.
pub async fn validator_detail(
    state: &AppState,
    address: ValidatorAddress,
) -> Result<ValidatorDetail, UpstreamError> {
    let metrics = &state.metrics;

    let (profile, stake, participation, guardian, validator) = tokio::try_join!(
        metrics.track(
            Upstream::Ethereum,
            GET_VALIDATOR_DATA,
            state.ethereum.get_validator_data(address),
        ),
        metrics.track(
            Upstream::Orbs,
            GET_VALIDATOR_STAKE,
            state.orbs.get_validator_stake(address),
        ),
        metrics.track(
            Upstream::Orbs,
            GET_PARTICIPATION_REWARD,
            state.orbs.get_participation_reward(address),
        ),
        metrics.track(
            Upstream::Orbs,
            GET_GUARDIAN_REWARD,
            state.orbs.get_guardian_reward(address),
        ),
        metrics.track(
            Upstream::Orbs,
            GET_VALIDATOR_REWARD,
            state.orbs.get_validator_reward(address),
        ),
    )?;

    let rewards = RewardBreakdown::new(stake, participation, guardian, validator)
        .map_err(|e| UpstreamError::malformed(Upstream::Orbs, e))?;

    Ok(ValidatorDetail { profile, rewards })
}
