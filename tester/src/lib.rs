//! In-memory stand-in for the poll backend.
//!
//! Serves the same routes the `poll` client talks to, keeps everything in
//! memory and hands out a fixed verification code. Useful for running the
//! CLI locally and for the integration tests of the client library.
//!
//! ```sh
//! RUST_LOG=info RUST_PORT=8000 cargo run -p poll-tester
//! ```
use std::{io, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tokio::{net::TcpListener, signal::ctrl_c};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{
    create_admin_handler, create_poll_handler, delete_poll_handler, delete_vote_handler,
    list_polls_handler, login_handler, poll_handler, poll_votes_handler, request_code_handler,
    results_handler, toggle_poll_handler, verify_code_handler, vote_handler,
};
use state::State;

pub fn router(state: Arc<State>) -> Router {
    Router::new()
        .route("/otp/request", post(request_code_handler))
        .route("/otp/verify", post(verify_code_handler))
        .route("/vote", post(vote_handler))
        .route("/admin/login", post(login_handler))
        .route("/admin", post(create_admin_handler))
        .route("/poll", get(list_polls_handler).post(create_poll_handler))
        .route("/poll/", post(create_poll_handler))
        .route("/poll/{id}", get(poll_handler).delete(delete_poll_handler))
        .route("/poll/{id}/results", get(results_handler))
        .route("/poll/{id}/toggle", patch(toggle_poll_handler))
        .route("/votes/poll/{id}", get(poll_votes_handler))
        .route("/votes/{id}", delete(delete_vote_handler))
        .with_state(state)
}

/// Binds an ephemeral local port and serves in the background.
pub async fn spawn(config: Config) -> io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let app = router(State::new(config));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Stub backend stopped: {e}");
        }
    });

    Ok(address)
}

/// Serves on `RUST_PORT` until Ctrl+C or SIGTERM.
pub async fn start_server() -> io::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let state = State::new(Config::load());
    let address = format!("0.0.0.0:{}", state.config.port);

    let listener = TcpListener::bind(&address).await?;
    info!(
        "Stub backend on {address}, admin {} and code {}",
        state.config.admin_email, state.config.code
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stub backend stopped");
    Ok(())
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!("SIGTERM handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = interrupt => info!("Received Ctrl+C"),
        _ = terminate() => info!("Received SIGTERM"),
    }
}
