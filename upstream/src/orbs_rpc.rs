use core::fmt;
use core::time::Duration;

use alloy_primitives::{Bytes, U256};
use async_trait::async_trait;
use orbs_proxy_types::{RetryConfig, ValidatorAddress};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{from_reqwest, Upstream, UpstreamError};
use crate::json_structures::{
    Argument, ArgumentKind, RunQueryRequest, RunQueryResponse,
    EXECUTION_RESULT_ERROR_SMART_CONTRACT, EXECUTION_RESULT_SUCCESS, REQUEST_STATUS_COMPLETED,
};
use crate::retry::with_retry;
use crate::OrbsClient;

pub const ELECTIONS_CONTRACT: &str = "_Elections";

pub const GET_ELECTED_VALIDATORS: &str = "getElectedValidatorsEthereumAddress";
pub const GET_VALIDATOR_STAKE: &str = "getValidatorStake";
pub const GET_PARTICIPATION_REWARD: &str = "getCumulativeParticipationReward";
pub const GET_GUARDIAN_REWARD: &str = "getCumulativeGuardianExcellenceReward";
pub const GET_VALIDATOR_REWARD: &str = "getCumulativeValidatorReward";

/// Client running read-only queries against the elections contract of an Orbs
/// virtual chain.
#[derive(Clone)]
pub struct OrbsRPC {
    client: Client,
    query_url: Url,
    timeout: Duration,
    retry: RetryConfig,
}

impl fmt::Display for OrbsRPC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_url)
    }
}

/// Builds `{node}/vchains/{id}/api/v1/run-query`, keeping any path prefix of `node`.
pub fn run_query_url(node_address: &Url, virtual_chain_id: u32) -> Result<Url, UpstreamError> {
    let chain = virtual_chain_id.to_string();
    let mut url = node_address.clone();
    url.path_segments_mut()
        .map_err(|()| {
            UpstreamError::unavailable(
                Upstream::Orbs,
                format!("node address {node_address} cannot be a base URL"),
            )
        })?
        .pop_if_empty()
        .extend(["vchains", chain.as_str(), "api", "v1", "run-query"]);
    Ok(url)
}

impl OrbsRPC {
    pub fn new(
        node_address: &Url,
        virtual_chain_id: u32,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Client::builder()
                .build()
                .map_err(|e| UpstreamError::unavailable(Upstream::Orbs, e))?,
            query_url: run_query_url(node_address, virtual_chain_id)?,
            timeout,
            retry,
        })
    }

    async fn run_query(
        &self,
        method: &str,
        arguments: Vec<Argument>,
    ) -> Result<Argument, UpstreamError> {
        let body = RunQueryRequest {
            contract_name: ELECTIONS_CONTRACT,
            method_name: method,
            arguments,
        };
        let timeout = self.timeout;
        let to_error = |e| from_reqwest(Upstream::Orbs, timeout, e);

        let response: RunQueryResponse = self
            .client
            .post(self.query_url.clone())
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(to_error)?
            .error_for_status()
            .map_err(to_error)?
            .json()
            .await
            .map_err(to_error)?;

        let execution_result = response.execution_result.as_deref().unwrap_or_default();

        if response.request_status != REQUEST_STATUS_COMPLETED {
            return Err(UpstreamError::unavailable(
                Upstream::Orbs,
                format!(
                    "{method}: request status {}, execution result {execution_result}",
                    response.request_status
                ),
            ));
        }

        match execution_result {
            EXECUTION_RESULT_SUCCESS => {}
            EXECUTION_RESULT_ERROR_SMART_CONTRACT => {
                return Err(UpstreamError::reverted(
                    Upstream::Orbs,
                    format!("{method}: {execution_result}"),
                ));
            }
            other => {
                return Err(UpstreamError::unavailable(
                    Upstream::Orbs,
                    format!("{method}: execution result {other}"),
                ));
            }
        }

        debug!(method, block_height = ?response.block_height, "query completed");

        response.output_arguments.into_iter().next().ok_or_else(|| {
            UpstreamError::malformed(Upstream::Orbs, format!("{method}: no output arguments"))
        })
    }

    async fn query_bytes(&self, method: &str) -> Result<Bytes, UpstreamError> {
        let output = self.run_query(method, Vec::new()).await?;
        decode_bytes(method, &output)
    }

    async fn query_amount(
        &self,
        method: &str,
        address: ValidatorAddress,
    ) -> Result<U256, UpstreamError> {
        let output = self
            .run_query(method, vec![Argument::bytes(address.as_slice())])
            .await?;
        decode_amount(method, &output)
    }

    async fn amount_with_retry(
        &self,
        method: &'static str,
        address: ValidatorAddress,
    ) -> Result<U256, UpstreamError> {
        with_retry(Upstream::Orbs, method, self.timeout, &self.retry, || {
            self.query_amount(method, address)
        })
        .await
    }
}

fn decode_bytes(method: &str, output: &Argument) -> Result<Bytes, UpstreamError> {
    if output.kind != ArgumentKind::Bytes {
        return Err(UpstreamError::malformed(
            Upstream::Orbs,
            format!("{method}: expected bytes output, got {:?}", output.kind),
        ));
    }

    let digits = output.value.strip_prefix("0x").unwrap_or(&output.value);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| UpstreamError::malformed(Upstream::Orbs, format!("{method}: {e}")))
}

fn decode_amount(method: &str, output: &Argument) -> Result<U256, UpstreamError> {
    match output.kind {
        ArgumentKind::Uint32 | ArgumentKind::Uint64 | ArgumentKind::Uint256 => {
            U256::from_str_radix(&output.value, 10)
                .map_err(|e| UpstreamError::malformed(Upstream::Orbs, format!("{method}: {e}")))
        }
        kind => Err(UpstreamError::malformed(
            Upstream::Orbs,
            format!("{method}: expected integer output, got {kind:?}"),
        )),
    }
}

#[async_trait]
impl OrbsClient for OrbsRPC {
    async fn get_elected_validators(&self) -> Result<Bytes, UpstreamError> {
        with_retry(
            Upstream::Orbs,
            GET_ELECTED_VALIDATORS,
            self.timeout,
            &self.retry,
            || self.query_bytes(GET_ELECTED_VALIDATORS),
        )
        .await
    }

    async fn get_validator_stake(&self, address: ValidatorAddress) -> Result<U256, UpstreamError> {
        self.amount_with_retry(GET_VALIDATOR_STAKE, address).await
    }

    async fn get_participation_reward(
        &self,
        address: ValidatorAddress,
    ) -> Result<U256, UpstreamError> {
        self.amount_with_retry(GET_PARTICIPATION_REWARD, address)
            .await
    }

    async fn get_guardian_reward(&self, address: ValidatorAddress) -> Result<U256, UpstreamError> {
        self.amount_with_retry(GET_GUARDIAN_REWARD, address).await
    }

    async fn get_validator_reward(&self, address: ValidatorAddress) -> Result<U256, UpstreamError> {
        self.amount_with_retry(GET_VALIDATOR_REWARD, address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_url_appends_virtual_chain_path() {
        let node = Url::parse("http://node.orbs.network").unwrap();
        assert_eq!(
            run_query_url(&node, 1_100_000).unwrap().as_str(),
            "http://node.orbs.network/vchains/1100000/api/v1/run-query"
        );

        let prefixed = Url::parse("http://gateway.local/orbs/").unwrap();
        assert_eq!(
            run_query_url(&prefixed, 42).unwrap().as_str(),
            "http://gateway.local/orbs/vchains/42/api/v1/run-query"
        );
    }

    #[test]
    fn amounts_accept_every_integer_width() {
        for kind in [ArgumentKind::Uint32, ArgumentKind::Uint64, ArgumentKind::Uint256] {
            let output = Argument {
                kind,
                value: "18446744073709551616".to_string(),
            };
            assert_eq!(
                decode_amount("m", &output).unwrap(),
                U256::from(u64::MAX) + U256::from(1u64)
            );
        }
    }

    #[test]
    fn amount_with_wrong_type_is_malformed() {
        let output = Argument {
            kind: ArgumentKind::String,
            value: "12".to_string(),
        };
        assert!(matches!(
            decode_amount("m", &output),
            Err(UpstreamError::Malformed { .. })
        ));
    }

    #[test]
    fn bytes_output_is_hex_decoded() {
        let output = Argument::bytes(&[1, 2, 3]);
        assert_eq!(
            decode_bytes("m", &output).unwrap(),
            Bytes::from(vec![1u8, 2, 3])
        );

        let garbage = Argument {
            kind: ArgumentKind::Bytes,
            value: "0xnothex".to_string(),
        };
        assert!(matches!(
            decode_bytes("m", &garbage),
            Err(UpstreamError::Malformed { .. })
        ));
    }
}
