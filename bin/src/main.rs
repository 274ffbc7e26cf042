use color_eyre::eyre::{self, WrapErr};
use tracing::info;

use orbs_proxy_app::ProxyServer;
use orbs_proxy_cli::args::Args;
use orbs_proxy_cli::config::load_config;
use orbs_proxy_cli::logging;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::new();
    logging::init(
        args.get_log_level_or_default(),
        args.get_log_format_or_default(),
    );

    let config = load_config(args.config.as_deref(), &args.overrides)
        .wrap_err("failed to load configuration")?;

    let mut server = ProxyServer::from_config(&config)?;
    server.start().await?;

    tokio::signal::ctrl_c()
        .await
        .wrap_err("failed to listen for shutdown signal")?;

    info!("shutting down");
    server.stop().await?;

    Ok(())
}
