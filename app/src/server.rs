use core::net::SocketAddr;
use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use orbs_proxy_cli::config::Config;
use orbs_proxy_upstream::{EthereumClient, EthereumRPC, OrbsClient, OrbsRPC, UpstreamError};

use crate::routes::router;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server is already running on {0}")]
    AlreadyRunning(SocketAddr),

    #[error("Error binding {addr}. Details: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Error building upstream client: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Error serving requests: {0}")]
    Serve(#[from] io::Error),

    #[error("Error joining server task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

struct Running {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<io::Result<()>>,
}

/// HTTP server exposing the aggregation routes.
///
/// `start` binds and serves in a background task; `stop` drains in-flight
/// requests and waits for the task to finish.
pub struct ProxyServer {
    addr: SocketAddr,
    state: AppState,
    running: Option<Running>,
}

impl ProxyServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            state,
            running: None,
        }
    }

    pub fn with_clients(
        addr: SocketAddr,
        ethereum: Arc<dyn EthereumClient>,
        orbs: Arc<dyn OrbsClient>,
    ) -> Self {
        Self::new(addr, AppState::new(ethereum, orbs))
    }

    /// Builds the JSON-RPC adapters described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let ethereum = EthereumRPC::new(
            config.ethereum.provider_url.clone(),
            config.ethereum.registry_address,
            config.ethereum.timeout,
            config.retry.clone(),
        )?;
        let orbs = OrbsRPC::new(
            &config.orbs.node_address,
            config.orbs.virtual_chain_id,
            config.orbs.timeout,
            config.retry.clone(),
        )?;

        info!(
            ethereum = %ethereum,
            orbs = %orbs,
            "configured upstreams"
        );

        Ok(Self::with_clients(
            SocketAddr::new(config.listen_addr, config.port),
            Arc::new(ethereum),
            Arc::new(orbs),
        ))
    }

    /// Address actually bound, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if let Some(running) = &self.running {
            return Err(ServerError::AlreadyRunning(running.local_addr));
        }

        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let app = router(self.state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // A dropped sender also stops the server.
                    let _ = signal.await;
                })
                .await
        });

        info!(%local_addr, "proxy listening");

        self.running = Some(Running {
            local_addr,
            shutdown,
            handle,
        });

        Ok(local_addr)
    }

    /// Stops accepting connections and waits for in-flight requests.
    /// Does nothing if the server is not running.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        if running.shutdown.send(()).is_err() {
            warn!(local_addr = %running.local_addr, "server task already exited");
        }

        running.handle.await??;
        info!(local_addr = %running.local_addr, "proxy stopped");
        Ok(())
    }
}
