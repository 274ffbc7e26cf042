use core::net::{IpAddr, Ipv4Addr};
use core::time::Duration;
use std::path::Path;

use alloy_primitives::Address;
use color_eyre::eyre;
use orbs_proxy_types::RetryConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

pub const ENV_PREFIX: &str = "ORBS_PROXY";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Interface the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: IpAddr,

    /// TCP port the HTTP server binds to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Validators registry on Ethereum
    pub ethereum: EthereumConfig,

    /// Elections contract on the Orbs virtual chain
    pub orbs: OrbsConfig,

    /// Backoff applied to transient upstream failures
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EthereumConfig {
    /// JSON-RPC endpoint of an Ethereum node
    #[serde(alias = "providerUrl")]
    pub provider_url: Url,

    /// Address of the validators registry contract
    #[serde(alias = "registryAddress")]
    pub registry_address: Address,

    /// Per-call timeout
    /// Supports human-readable format: "500ms", "5s", etc.
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbsConfig {
    /// Base URL of an Orbs node
    #[serde(alias = "nodeAddress")]
    pub node_address: Url,

    #[serde(alias = "virtualChainId")]
    pub virtual_chain_id: u32,

    /// Per-call timeout
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_listen_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Command-line values taking precedence over the file and the environment.
#[derive(clap::Args, Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Port the HTTP server listens on
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// JSON-RPC endpoint of an Ethereum node
    #[arg(long, value_name = "URL")]
    pub ethereum_provider_url: Option<Url>,

    /// Base URL of an Orbs node
    #[arg(long, value_name = "URL")]
    pub orbs_node_address: Option<Url>,

    /// Orbs virtual chain id
    #[arg(long, value_name = "ID")]
    pub orbs_virtual_chain_id: Option<u32>,
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        check_http_url("ethereum.provider_url", &self.ethereum.provider_url)?;
        check_http_url("orbs.node_address", &self.orbs.node_address)?;

        if self.ethereum.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "ethereum.timeout must be greater than zero".to_string(),
            ));
        }
        if self.orbs.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "orbs.timeout must be greater than zero".to_string(),
            ));
        }
        if self.retry.multiplier < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "retry.multiplier must be at least 1.0, got {}",
                self.retry.multiplier
            )));
        }

        Ok(())
    }
}

fn check_http_url(key: &str, url: &Url) -> Result<(), Error> {
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(()),
        scheme => Err(Error::InvalidConfig(format!(
            "{key} must be an http(s) URL, got scheme `{scheme}` in {url}"
        ))),
    }
}

/// Merges the optional TOML file, `ORBS_PROXY__*` environment variables and
/// command-line overrides, in increasing order of precedence.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> eyre::Result<Config> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()).into());
        }
        builder = builder.add_source(::config::File::from(path));
    }

    let config: Config = builder
        .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .set_override_option("port", overrides.port.map(i64::from))
        .map_err(Error::from)?
        .set_override_option(
            "ethereum.provider_url",
            overrides.ethereum_provider_url.as_ref().map(Url::to_string),
        )
        .map_err(Error::from)?
        .set_override_option(
            "orbs.node_address",
            overrides.orbs_node_address.as_ref().map(Url::to_string),
        )
        .map_err(Error::from)?
        .set_override_option(
            "orbs.virtual_chain_id",
            overrides.orbs_virtual_chain_id.map(i64::from),
        )
        .map_err(Error::from)?
        .build()
        .map_err(Error::from)?
        .try_deserialize()
        .map_err(Error::from)?;

    config.validate()?;
    Ok(config)
}
