//! Decoding of the elected validators buffer returned by the virtual chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::ValidatorAddress;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(
        "elected validators buffer length {len} is not a multiple of {}",
        ValidatorAddress::LENGTH
    )]
    TrailingBytes { len: usize },
}

/// Ordered set of elected validators, in on-chain storage order.
///
/// No sorting or de-duplication is applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectedValidatorSet(Vec<ValidatorAddress>);

impl ElectedValidatorSet {
    /// Splits `buf` into consecutive 20-byte addresses.
    ///
    /// A buffer whose length is not an exact multiple of 20 is rejected rather
    /// than yielding a truncated trailing address.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() % ValidatorAddress::LENGTH != 0 {
            return Err(DecodeError::TrailingBytes { len: buf.len() });
        }

        let validators = buf
            .chunks_exact(ValidatorAddress::LENGTH)
            .map(|chunk| {
                let mut bytes = [0u8; ValidatorAddress::LENGTH];
                bytes.copy_from_slice(chunk);
                ValidatorAddress::new(bytes)
            })
            .collect();

        Ok(Self(validators))
    }

    /// Concatenates the addresses back into a single buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0
            .iter()
            .flat_map(|addr| addr.into_inner())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidatorAddress> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidatorAddress> {
        self.0
    }
}
