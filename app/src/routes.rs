//! HTTP surface of the proxy.

use axum::extract::{MatchedPath, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use orbs_proxy_types::{ElectedValidatorSet, ValidatorAddress, ValidatorDetail};

use crate::aggregate;
use crate::error::ApiError;
use crate::state::AppState;

/// Origins allowed to call the API from a browser.
pub const ALLOWED_ORIGINS: [&str; 2] = ["https://orbs-network.github.io", "http://localhost:3000"];

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/validators/elected", get(elected_validators))
        .route("/validators/elected/:address", get(validator_detail));

    Router::new()
        .route("/is_alive", get(is_alive))
        .nest("/api", api)
        .route("/metrics", get(metrics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            record_request,
        ))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            ALLOWED_ORIGINS.map(HeaderValue::from_static),
        ))
        .allow_methods([Method::GET])
}

async fn record_request(
    State(state): State<AppState>,
    matched: MatchedPath,
    request: Request,
    next: Next,
) -> Response {
    let route = matched.as_str().to_owned();
    let response = next.run(request).await;
    state.metrics.record_request(&route, response.status());
    response
}

async fn is_alive() -> StatusCode {
    StatusCode::OK
}

async fn elected_validators(
    State(state): State<AppState>,
) -> Result<Json<ElectedValidatorSet>, ApiError> {
    Ok(Json(aggregate::elected_validators(&state).await?))
}

async fn validator_detail(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ValidatorDetail>, ApiError> {
    let address: ValidatorAddress = address.parse()?;
    Ok(Json(aggregate::validator_detail(&state, address).await?))
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => ([(CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
