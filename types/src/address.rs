use core::fmt;
use core::str::FromStr;

use alloy_primitives::Address as AlloyAddress;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors raised when parsing an address from its textual form.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseAddressError {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid address length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// A 20-byte Ethereum address.
///
/// Always rendered lower-case with a `0x` prefix, which is also the canonical
/// form used for lookups.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatorAddress(AlloyAddress);

impl ValidatorAddress {
    pub const LENGTH: usize = 20;

    pub const fn new(value: [u8; Self::LENGTH]) -> Self {
        Self(AlloyAddress::new(value))
    }

    /// Builds an address from a slice that must be exactly [`Self::LENGTH`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseAddressError> {
        let value: [u8; Self::LENGTH] =
            bytes
                .try_into()
                .map_err(|_| ParseAddressError::InvalidLength {
                    expected: Self::LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self::new(value))
    }

    pub fn into_inner(self) -> [u8; Self::LENGTH] {
        self.0.into()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Creates an address where all bytes are set to `byte`.
    #[inline]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self(AlloyAddress::repeat_byte(byte))
    }

    pub fn to_alloy_address(&self) -> AlloyAddress {
        self.0
    }
}

impl fmt::Display for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorAddress({self})")
    }
}

impl FromStr for ValidatorAddress {
    type Err = ParseAddressError;

    /// Accepts the address with or without the `0x` prefix, in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)?;
        Self::from_slice(&bytes)
    }
}

impl From<AlloyAddress> for ValidatorAddress {
    fn from(addr: AlloyAddress) -> Self {
        Self(addr)
    }
}

impl From<ValidatorAddress> for AlloyAddress {
    fn from(addr: ValidatorAddress) -> Self {
        addr.0
    }
}

impl Serialize for ValidatorAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ValidatorAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
