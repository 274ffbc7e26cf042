#![allow(dead_code)]

use core::time::Duration;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use orbs_proxy_app::{router, AppState};
use orbs_proxy_types::{Bytes, ValidatorAddress, ValidatorProfile, U256};
use orbs_proxy_upstream::orbs_rpc::{
    GET_ELECTED_VALIDATORS, GET_GUARDIAN_REWARD, GET_PARTICIPATION_REWARD, GET_VALIDATOR_REWARD,
    GET_VALIDATOR_STAKE,
};
use orbs_proxy_upstream::{EthereumClient, OrbsClient, UpstreamError};
use tower::ServiceExt;

/// In-memory registry answering with a fixed profile for every address,
/// after `delay` when one is set.
#[derive(Default)]
pub struct FakeEthereum {
    pub failure: Option<UpstreamError>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl FakeEthereum {
    pub fn failing(error: UpstreamError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

#[async_trait]
impl EthereumClient for FakeEthereum {
    async fn get_validator_data(
        &self,
        address: ValidatorAddress,
    ) -> Result<ValidatorProfile, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(ValidatorProfile {
                address,
                name: "Orbs Validator".to_string(),
                website: "https://validator.example".to_string(),
                node_address: ValidatorAddress::repeat_byte(0xaa),
            }),
        }
    }
}

/// In-memory elections contract. Methods listed in `failures` return the
/// associated error. Every method waits `delay` before answering.
#[derive(Default)]
pub struct FakeOrbs {
    pub elected: Bytes,
    pub stake: U256,
    pub participation: U256,
    pub guardian: U256,
    pub validator: U256,
    pub failures: HashMap<&'static str, UpstreamError>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl FakeOrbs {
    pub fn failing(mut self, method: &'static str, error: UpstreamError) -> Self {
        self.failures.insert(method, error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn answer<T>(&self, method: &str, value: T) -> Result<T, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.failures.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl OrbsClient for FakeOrbs {
    async fn get_elected_validators(&self) -> Result<Bytes, UpstreamError> {
        self.answer(GET_ELECTED_VALIDATORS, self.elected.clone()).await
    }

    async fn get_validator_stake(&self, _: ValidatorAddress) -> Result<U256, UpstreamError> {
        self.answer(GET_VALIDATOR_STAKE, self.stake).await
    }

    async fn get_participation_reward(&self, _: ValidatorAddress) -> Result<U256, UpstreamError> {
        self.answer(GET_PARTICIPATION_REWARD, self.participation).await
    }

    async fn get_guardian_reward(&self, _: ValidatorAddress) -> Result<U256, UpstreamError> {
        self.answer(GET_GUARDIAN_REWARD, self.guardian).await
    }

    async fn get_validator_reward(&self, _: ValidatorAddress) -> Result<U256, UpstreamError> {
        self.answer(GET_VALIDATOR_REWARD, self.validator).await
    }
}

pub fn app(ethereum: FakeEthereum, orbs: FakeOrbs) -> Router {
    router(AppState::new(Arc::new(ethereum), Arc::new(orbs)))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: body.to_vec(),
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}
