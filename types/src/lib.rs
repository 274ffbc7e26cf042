//! Domain types shared by the proxy crates: validator addresses, the elected
//! validator set, registry profiles and reward breakdowns.

mod address;
mod retry_config;
mod validator;

pub mod elected;

pub use address::{ParseAddressError, ValidatorAddress};
pub use elected::{DecodeError, ElectedValidatorSet};
pub use retry_config::RetryConfig;
pub use validator::{decimal, RewardBreakdown, RewardOverflow, ValidatorDetail, ValidatorProfile};

pub use alloy_primitives::{Bytes, U256};
