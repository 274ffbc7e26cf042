use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use orbs_proxy_types::ParseAddressError;
use orbs_proxy_upstream::UpstreamError;

/// Failure of an aggregation route.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid validator address: {0}")]
    InvalidAddress(#[from] ParseAddressError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// JSON body returned with every error status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(UpstreamError::Unavailable { .. } | UpstreamError::Timeout { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Upstream(UpstreamError::Reverted { .. }) => StatusCode::NOT_FOUND,
            Self::Upstream(UpstreamError::Malformed { .. }) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAddress(_) => "invalid_address",
            Self::Upstream(UpstreamError::Unavailable { .. } | UpstreamError::Timeout { .. }) => {
                "upstream_unavailable"
            }
            Self::Upstream(UpstreamError::Reverted { .. }) => "not_found",
            Self::Upstream(UpstreamError::Malformed { .. }) => "malformed_upstream_data",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(%status, error = %self, "request failed");
        }

        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use orbs_proxy_upstream::Upstream;

    use super::*;

    #[test]
    fn upstream_errors_map_to_statuses() {
        let cases = [
            (
                UpstreamError::unavailable(Upstream::Orbs, "connection refused"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                UpstreamError::Timeout {
                    upstream: Upstream::Ethereum,
                    timeout: core::time::Duration::from_secs(5),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                UpstreamError::reverted(Upstream::Ethereum, "not registered"),
                StatusCode::NOT_FOUND,
            ),
            (
                UpstreamError::malformed(Upstream::Orbs, "odd length"),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn bad_address_is_a_client_error() {
        let parse_error = "0x1234".parse::<orbs_proxy_types::ValidatorAddress>().unwrap_err();
        let error = ApiError::from(parse_error);
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "invalid_address");
    }
}
