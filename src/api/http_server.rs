// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::health_handler;
use super::predict::predict_handler;
use crate::diagnosis::{ClassCatalog, CropAnalyzer, SeverityTable};
use crate::vision::{ClassifierModelManager, ImageFetcher};

/// Shared, read-only request context
#[derive(Clone)]
pub struct AppState {
    /// `None` when the classifier failed to load at startup
    pub analyzer: Option<Arc<CropAnalyzer>>,
}

impl AppState {
    pub fn new(analyzer: Arc<CropAnalyzer>) -> Self {
        Self {
            analyzer: Some(analyzer),
        }
    }

    /// State for a service running without a classifier model
    pub fn without_classifier() -> Self {
        Self { analyzer: None }
    }

    /// Assemble the analyzer from startup components.
    ///
    /// Falls back to [`AppState::without_classifier`] if the manager holds no
    /// model.
    pub fn from_components(
        manager: &ClassifierModelManager,
        catalog: ClassCatalog,
        severity: SeverityTable,
        fetcher: ImageFetcher,
    ) -> Self {
        match manager.get_classifier() {
            Some(classifier) => Self::new(Arc::new(CropAnalyzer::new(
                catalog, severity, fetcher, classifier,
            ))),
            None => Self::without_classifier(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/predict", post(predict_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn start_server<F>(addr: SocketAddr, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("API server failed")?;

    Ok(())
}
