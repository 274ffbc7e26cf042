use core::fmt;
use core::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// The two collaborators the proxy reads from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Upstream {
    Ethereum,
    Orbs,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Orbs => "orbs",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single collaborator call.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum UpstreamError {
    /// Endpoint unreachable, HTTP failure or node-side error
    #[error("{upstream} unavailable: {message}")]
    Unavailable { upstream: Upstream, message: String },

    #[error("{upstream} call timed out after {timeout:?}")]
    Timeout { upstream: Upstream, timeout: Duration },

    /// The contract call reverted, e.g. the address is not a registered validator
    #[error("{upstream} contract call reverted: {message}")]
    Reverted { upstream: Upstream, message: String },

    /// The response could not be decoded
    #[error("malformed data from {upstream}: {message}")]
    Malformed { upstream: Upstream, message: String },
}

impl UpstreamError {
    pub fn unavailable(upstream: Upstream, message: impl fmt::Display) -> Self {
        Self::Unavailable {
            upstream,
            message: message.to_string(),
        }
    }

    pub fn reverted(upstream: Upstream, message: impl fmt::Display) -> Self {
        Self::Reverted {
            upstream,
            message: message.to_string(),
        }
    }

    pub fn malformed(upstream: Upstream, message: impl fmt::Display) -> Self {
        Self::Malformed {
            upstream,
            message: message.to_string(),
        }
    }

    pub fn upstream(&self) -> Upstream {
        match self {
            Self::Unavailable { upstream, .. }
            | Self::Timeout { upstream, .. }
            | Self::Reverted { upstream, .. }
            | Self::Malformed { upstream, .. } => *upstream,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::Timeout { .. } => "timeout",
            Self::Reverted { .. } => "reverted",
            Self::Malformed { .. } => "malformed",
        }
    }
}

/// Classifies a `reqwest` failure. Body decoding errors mean the endpoint answered
/// with something other than the expected JSON.
///
/// Client error statuses other than 408 and 429 will not change on retry, so they
/// are reported as malformed rather than unavailable.
pub(crate) fn from_reqwest(
    upstream: Upstream,
    timeout: Duration,
    error: reqwest::Error,
) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout { upstream, timeout }
    } else if error.status().is_some_and(is_permanent_status) {
        UpstreamError::malformed(upstream, error)
    } else if error.is_decode() {
        UpstreamError::malformed(upstream, error)
    } else {
        UpstreamError::unavailable(upstream, error)
    }
}

fn is_permanent_status(status: StatusCode) -> bool {
    status.is_client_error()
        && status != StatusCode::REQUEST_TIMEOUT
        && status != StatusCode::TOO_MANY_REQUESTS
}
