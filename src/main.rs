use clap::Parser;
use fraud_query_gateway::{http, FraudQueryGateway, GatewayConfig, NatsConnection, NatsQueryBus};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Fraud query gateway - HTTP lookups over NATS request/reply
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the local properties file
    #[arg(short, long, env = "FRAUD_QUERY_CONFIG", default_value = "application.properties")]
    config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway stopped with error");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = GatewayConfig::load(&args.config)?;
    if let Some(port) = args.port {
        config.server_port = port;
    }

    let connection = NatsConnection::connect(&config).await?;
    connection.log_health();

    let gateway = Arc::new(FraudQueryGateway::new(
        NatsQueryBus::new(connection.client()),
        config.topic.clone(),
        config.request_timeout,
    ));
    let app = http::router(gateway);

    let ip: IpAddr = config.server_host.parse()?;
    let addr = SocketAddr::new(ip, config.server_port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        topic = %config.topic,
        timeout = ?config.request_timeout,
        "Starting fraud query gateway"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    connection.shutdown().await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
