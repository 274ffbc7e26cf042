use core::fmt;
use core::time::Duration;

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use orbs_proxy_types::{RetryConfig, ValidatorAddress, ValidatorProfile};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::{from_reqwest, Upstream, UpstreamError};
use crate::json_structures::{JsonRequestBody, JsonResponseBody};
use crate::retry::with_retry;
use crate::EthereumClient;

pub const ETH_CALL: &str = "eth_call";
pub const GET_VALIDATOR_DATA: &str = "getValidatorData";

alloy_sol_types::sol! {
    /// Validators registry deployed on Ethereum
    interface IOrbsValidatorsRegistry {
        function getValidatorData(address validator)
            external
            view
            returns (string name, bytes4 ipAddress, string website, bytes20 orbsAddress);
    }
}

/// JSON-RPC client reading validator profiles from the registry contract.
#[derive(Clone)]
pub struct EthereumRPC {
    client: Client,
    url: Url,
    registry: Address,
    timeout: Duration,
    retry: RetryConfig,
}

impl fmt::Display for EthereumRPC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl EthereumRPC {
    pub fn new(
        url: Url,
        registry: Address,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Client::builder()
                .build()
                .map_err(|e| UpstreamError::unavailable(Upstream::Ethereum, e))?,
            url,
            registry,
            timeout,
            retry,
        })
    }

    pub async fn rpc_request<D: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<D, UpstreamError> {
        let body = JsonRequestBody {
            jsonrpc: "2.0",
            method,
            params,
            id: json!(1),
        };
        let timeout = self.timeout;
        let to_error = |e| from_reqwest(Upstream::Ethereum, timeout, e);

        let response: JsonResponseBody = self
            .client
            .post(self.url.clone())
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

        match response.error {
            Some(error) if error.is_revert() => Err(UpstreamError::reverted(
                Upstream::Ethereum,
                format!("code: {}, message: {}", error.code, error.message),
            )),
            Some(error) => Err(UpstreamError::unavailable(
                Upstream::Ethereum,
                format!("code: {}, message: {}", error.code, error.message),
            )),
            None => serde_json::from_value(response.result)
                .map_err(|e| UpstreamError::malformed(Upstream::Ethereum, e)),
        }
    }

    /// Executes a read-only call against the registry at the latest block.
    async fn call_registry(&self, data: Vec<u8>) -> Result<Bytes, UpstreamError> {
        let params = json!([
            { "to": self.registry, "data": Bytes::from(data) },
            "latest"
        ]);
        self.rpc_request(ETH_CALL, params).await
    }

    async fn fetch_validator_data(
        &self,
        address: ValidatorAddress,
    ) -> Result<ValidatorProfile, UpstreamError> {
        let call = IOrbsValidatorsRegistry::getValidatorDataCall {
            validator: address.to_alloy_address(),
        };
        let output = self.call_registry(call.abi_encode()).await?;

        // Calls to an address without code succeed with empty output.
        if output.is_empty() {
            return Err(UpstreamError::malformed(
                Upstream::Ethereum,
                format!("empty output from registry {}", self.registry),
            ));
        }

        let decoded = IOrbsValidatorsRegistry::getValidatorDataCall::abi_decode_returns(&output)
            .map_err(|e| UpstreamError::malformed(Upstream::Ethereum, e))?;

        debug!(%address, name = %decoded.name, "fetched validator data");

        Ok(ValidatorProfile {
            address,
            name: decoded.name,
            website: decoded.website,
            node_address: ValidatorAddress::new(decoded.orbsAddress.0),
        })
    }
}

#[async_trait]
impl EthereumClient for EthereumRPC {
    async fn get_validator_data(
        &self,
        address: ValidatorAddress,
    ) -> Result<ValidatorProfile, UpstreamError> {
        with_retry(
            Upstream::Ethereum,
            GET_VALIDATOR_DATA,
            self.timeout,
            &self.retry,
            || self.fetch_validator_data(address),
        )
        .await
    }
}
