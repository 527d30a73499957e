// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode};

use supply_order_server::{
    api::{accounts::create_account, router},
    auth::{Role, TokenService},
    config::AppConfig,
    models::RegisterRequest,
    state::AppState,
    store::UserStore,
    telemetry,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(config.log_format) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = TokenService::from_config(&config.jwt)?;
    let state = AppState::new(tokens, UserStore::new());

    if let Some(seed) = &config.seed_admin {
        let request = RegisterRequest {
            email: seed.email.clone(),
            password: seed.password.clone(),
            display_name: "Administrator".to_string(),
        };
        let admin = create_account(&state, request, Role::Admin).await?;
        tracing::info!(user_id = %admin.id, "seed admin created");
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        token_ttl_ms = state.tokens.ttl().num_milliseconds(),
        "Supply order server listening (docs at /docs)"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
