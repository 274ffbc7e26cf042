//! Read-only HTTP proxy aggregating Orbs validator data from an Ethereum
//! registry contract and an Orbs virtual chain.

pub mod aggregate;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use metrics::Metrics;
pub use routes::router;
pub use server::{ProxyServer, ServerError};
pub use state::AppState;
