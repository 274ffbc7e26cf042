//! Shared state handed to every request handler.

use std::sync::Arc;

use orbs_proxy_upstream::{EthereumClient, OrbsClient};

use crate::metrics::Metrics;

/// Collaborators are held as trait objects so tests can substitute doubles.
#[derive(Clone)]
pub struct AppState {
    pub ethereum: Arc<dyn EthereumClient>,
    pub orbs: Arc<dyn OrbsClient>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(ethereum: Arc<dyn EthereumClient>, orbs: Arc<dyn OrbsClient>) -> Self {
        Self {
            ethereum,
            orbs,
            metrics: Metrics::new(),
        }
    }
}
