use std::{net::SocketAddr, sync::Arc};

use axum::{Router, middleware, routing::get};
use clap::Parser;
use color_eyre::{Result, eyre::Context};
use meridian::{
    adapters::{
        StaticGeoIp, http_handler,
        http_handler::AppState,
        middleware::{cors_middleware, observability_middleware, request_id_middleware},
        transform::{RouteTransform, route_transform_middleware},
    },
    config::{self, models::ServerConfig},
    core::CountryDetector,
    tracing_setup,
};
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "gateway.toml")]
    config: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate configuration and routing table
    Validate {
        /// Configuration file to validate
        #[clap(short, long, default_value = "gateway.toml")]
        config: String,
    },
    /// Start the gateway server (default)
    Serve {
        /// Configuration file to use
        #[clap(short, long, default_value = "gateway.toml")]
        config: String,

        /// Use human-readable console logs instead of JSON
        #[clap(long)]
        pretty_logs: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    match args.command {
        Some(Commands::Validate { config }) => validate_command(&config),
        Some(Commands::Serve {
            config,
            pretty_logs,
        }) => serve(&config, pretty_logs).await,
        None => serve(&args.config, false).await,
    }
}

fn validate_command(config_path: &str) -> Result<()> {
    let server_config = config::load_server_config(config_path)
        .with_context(|| format!("Configuration {config_path} is invalid"))?;
    let table = config::load_routing_table(&server_config.routes_file);

    println!("Configuration {config_path} is valid");
    println!("  listen_addr: {}", server_config.listen_addr);
    println!("  routes_file: {}", server_config.routes_file);
    println!(
        "  routes: {} loaded, default {}",
        table.routes().len(),
        table.default_route()
    );
    Ok(())
}

/// Load the server settings, falling back to built-in defaults when the
/// file does not exist. A file that exists but fails to parse is an
/// operator error and aborts startup.
fn load_server_config_or_default(config_path: &str) -> Result<ServerConfig> {
    if !std::path::Path::new(config_path).exists() {
        tracing::warn!(
            "Server configuration {} not found, using built-in defaults",
            config_path
        );
        return Ok(ServerConfig::default());
    }
    config::load_server_config(config_path)
        .with_context(|| format!("Failed to load server configuration from {config_path}"))
}

async fn serve(config_path: &str, pretty_logs: bool) -> Result<()> {
    if pretty_logs {
        tracing_setup::init_console_tracing()?;
    } else {
        tracing_setup::init_tracing()?;
    }

    tracing::info!("Loading configuration from {}", config_path);
    let server_config = load_server_config_or_default(config_path)?;

    // The routing table load never fails; a broken resource degrades to the
    // safe default table.
    let table = Arc::new(config::load_routing_table(&server_config.routes_file));

    let geoip = Arc::new(StaticGeoIp::new(
        server_config.detection.fallback_country.clone(),
    ));
    let detector = CountryDetector::new(&server_config.detection, geoip);
    let transform = Arc::new(RouteTransform::new(detector, table.clone()));

    let state = AppState {
        table,
        transform: transform.clone(),
    };

    // Requests not handled by a diagnostic endpoint fall through to the
    // proxy pipeline, where the route transform publishes the upstream
    // target for the transport.
    let proxy = Router::new()
        .fallback(http_handler::proxy_placeholder)
        .layer(middleware::from_fn_with_state(
            transform,
            route_transform_middleware,
        ));

    let app = Router::new()
        .route("/", get(http_handler::status))
        .route("/status", get(http_handler::detailed_status))
        .route("/routes", get(http_handler::routes))
        .route("/detect", get(http_handler::detect))
        .with_state(state)
        .fallback_service(proxy)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(observability_middleware));

    let listener = TcpListener::bind(&server_config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", server_config.listen_addr))?;
    tracing::info!("Gateway listening on {}", server_config.listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, stopping gateway");
}
