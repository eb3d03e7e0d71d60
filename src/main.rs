mod api;
mod clients;
mod config;
mod engine;
mod error;
mod models;
mod observability;
mod state;

use std::sync::Arc;

use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::clients::{HttpAgentClient, HttpOrderClient, HttpRestaurantClient, http::build_client};
use crate::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let http = build_client(config.upstream_timeout)?;
    let order_client = Arc::new(HttpOrderClient::new(
        http.clone(),
        config.order_service_url.clone(),
    ));
    let agent_client = Arc::new(HttpAgentClient::new(
        http.clone(),
        config.agent_service_url.clone(),
    ));
    let restaurant_client = Arc::new(HttpRestaurantClient::new(
        http,
        config.restaurant_service_url.clone(),
    ));

    let agent_state = Arc::new(state::AgentState::new());
    let order_state = Arc::new(state::OrderState::new());
    let restaurant_state = Arc::new(state::RestaurantState::new(
        order_client.clone(),
        agent_client,
    ));
    let user_state = Arc::new(state::UserState::new(order_client, restaurant_client));

    serve_in_background(
        "delivery-agent",
        api::rest::agents::router(agent_state),
        config.agent_port,
    )
    .await?;
    serve_in_background(
        "order",
        api::rest::orders::router(order_state),
        config.order_port,
    )
    .await?;
    serve_in_background(
        "restaurant",
        api::rest::restaurants::router(restaurant_state),
        config.restaurant_port,
    )
    .await?;

    // The user gateway runs in the foreground and owns the shutdown signal.
    let app = api::rest::users::router(user_state);
    let listener = bind("user", config.user_port).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn bind(name: &'static str, port: u16) -> Result<tokio::net::TcpListener, AppError> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {addr}: {err}")))?;

    tracing::info!(service = name, port, "http server started");
    Ok(listener)
}

async fn serve_in_background(
    name: &'static str,
    app: Router,
    port: u16,
) -> Result<(), AppError> {
    let listener = bind(name, port).await?;

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            tracing::error!(service = name, error = %err, "server failed");
        }
    });

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
