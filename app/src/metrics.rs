use core::fmt;
use core::future::Future;
use core::ops::Deref;
use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::{Registry, Unit};

use orbs_proxy_upstream::{Upstream, UpstreamError};

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub route: String,
    pub status: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct UpstreamCallLabels {
    pub upstream: String,
    pub method: String,
    pub outcome: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct UpstreamLabels {
    pub upstream: String,
}

#[derive(Clone, Debug)]
pub struct Metrics(Arc<Inner>);

impl Deref for Metrics {
    type Target = Inner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct Inner {
    registry: Registry,

    /// Requests served, by matched route and status code
    http_requests: Family<RequestLabels, Counter>,

    /// Calls made to a collaborator, by method and outcome
    upstream_calls: Family<UpstreamCallLabels, Counter>,

    /// Time taken by collaborator calls, retries included (seconds)
    upstream_call_duration: Family<UpstreamLabels, Histogram>,
}

fn call_duration_histogram() -> Histogram {
    Histogram::new(exponential_buckets(0.005, 2.0, 12)) // Start from 5ms
}

impl Inner {
    pub fn new() -> Self {
        let histogram: fn() -> Histogram = call_duration_histogram;
        let mut inner = Self {
            registry: Registry::default(),
            http_requests: Family::default(),
            upstream_calls: Family::default(),
            upstream_call_duration: Family::new_with_constructor(histogram),
        };

        inner.registry.register(
            "http_requests",
            "Requests served, by matched route and status code",
            inner.http_requests.clone(),
        );

        inner.registry.register(
            "upstream_calls",
            "Calls made to a collaborator, by method and outcome",
            inner.upstream_calls.clone(),
        );

        inner.registry.register_with_unit(
            "upstream_call_duration",
            "Time taken by collaborator calls, retries included",
            Unit::Seconds,
            inner.upstream_call_duration.clone(),
        );

        inner
    }
}

impl Default for Inner {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self(Arc::new(Inner::new()))
    }

    pub fn record_request(&self, route: &str, status: StatusCode) {
        self.http_requests
            .get_or_create(&RequestLabels {
                route: route.to_string(),
                status: status.as_u16().to_string(),
            })
            .inc();
    }

    /// Awaits `call`, recording its outcome and duration.
    pub async fn track<T, F>(
        &self,
        upstream: Upstream,
        method: &str,
        call: F,
    ) -> Result<T, UpstreamError>
    where
        F: Future<Output = Result<T, UpstreamError>>,
    {
        let start = Instant::now();
        let result = call.await;

        self.upstream_call_duration
            .get_or_create(&UpstreamLabels {
                upstream: upstream.to_string(),
            })
            .observe(start.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };

        self.upstream_calls
            .get_or_create(&UpstreamCallLabels {
                upstream: upstream.to_string(),
                method: method.to_string(),
                outcome: outcome.to_string(),
            })
            .inc();

        result
    }

    /// Renders every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_outcomes_per_method() {
        let metrics = Metrics::new();

        let ok = metrics
            .track(Upstream::Orbs, "getValidatorStake", async { Ok(1u8) })
            .await;
        assert_eq!(ok, Ok(1));

        let err = metrics
            .track(Upstream::Ethereum, "getValidatorData", async {
                Err::<u8, _>(UpstreamError::reverted(Upstream::Ethereum, "not registered"))
            })
            .await;
        assert!(err.is_err());

        let text = metrics.encode().unwrap();
        assert!(text.contains(
            r#"upstream_calls_total{upstream="orbs",method="getValidatorStake",outcome="ok"} 1"#
        ));
        assert!(text.contains(
            r#"upstream_calls_total{upstream="ethereum",method="getValidatorData",outcome="reverted"} 1"#
        ));
        assert!(text.contains(r#"upstream_call_duration_seconds_count{upstream="orbs"} 1"#));
    }

    #[test]
    fn counts_requests_by_route_and_status() {
        let metrics = Metrics::new();
        metrics.record_request("/is_alive", StatusCode::OK);
        metrics.record_request("/is_alive", StatusCode::OK);

        let text = metrics.encode().unwrap();
        assert!(text.contains(r#"http_requests_total{route="/is_alive",status="200"} 2"#));
    }
}
