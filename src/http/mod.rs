//! Axum server: shared state, router construction and the serve loop.

mod error;
mod handlers;


use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::Database;
use crate::models::Month;
pub(crate) use error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    db: Arc<Mutex<Database>>,
    window_size: usize,
    /// Pinned "current month"; `None` reads the clock per request.
    today: Option<Month>,
}

impl AppState {
    pub(crate) fn new(db: Database, window_size: usize) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            window_size,
            today: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_today(mut self, today: Month) -> Self {
        self.today = Some(today);
        self
    }

    pub(crate) fn today(&self) -> Month {
        self.today.unwrap_or_else(Month::current)
    }

    /// Run `f` on the blocking pool with the database locked. A lock
    /// poisoned by an earlier panic is recovered.
    pub(crate) async fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let joined = tokio::task::spawn_blocking(move || {
            let guard = db.lock().unwrap_or_else(PoisonError::into_inner);
            f(&guard)
        })
        .await;
        match joined {
            Ok(result) => result.map_err(ApiError::Internal),
            Err(e) => Err(ApiError::Internal(anyhow::anyhow!("database task failed: {e}"))),
        }
    }
}

pub(crate) fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/calendar/months", get(handlers::calendar_months))
        .route("/calendar/activities", post(handlers::calendar_activities))
        .route("/capacity-summary", get(handlers::capacity_summary))
        .route("/capacity-summary/months", get(handlers::summary_months))
        .route("/allocation", post(handlers::create_allocation))
        .route("/allocation/{id}", delete(handlers::delete_allocation))
        .route("/capacity", post(handlers::create_capacity))
        .route("/employees", get(handlers::employees))
        .route("/accounts/{username}", get(handlers::account))
        .route("/initiatives", get(handlers::initiatives))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve until Ctrl-C.
pub(crate) async fn serve(state: AppState, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "capplan listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("Server error")?;

    tracing::info!("capplan stopped");
    Ok(())
}

/// Start the router on an ephemeral port and return the bound address.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) async fn start_server(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    addr
}
