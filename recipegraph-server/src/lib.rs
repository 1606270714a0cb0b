// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Recipegraph Server
//!
//! HTTP API over an immutable [`RecommenderContext`]:
//!
//! - `POST /recommend`: ranked recipe names for a multi-attribute query
//! - `GET /recipe/:recipe_name`: display record of one recipe
//! - `GET /unique_ingredients`, `/unique_regions`, `/unique_countries`
//! - `GET /health`
//!
//! Artifacts are loaded once at startup; a missing artifact aborts startup.

pub mod api;
pub mod config;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use recipegraph_core::RecommenderContext;
use recipegraph_index::open_oracle;
use recipegraph_storage::ArtifactStore;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::AppState;
use crate::config::ServerConfig;

/// Load the artifacts and the configured oracle into a service context
pub fn build_context(config: &ServerConfig) -> Result<RecommenderContext> {
    let store = ArtifactStore::new(&config.storage.data_dir);
    let bundle = store
        .load_bundle()
        .with_context(|| format!("Failed to load artifacts from {:?}", store.root()))?;

    let oracle = open_oracle(
        config.oracle.kind,
        Arc::new(bundle.graph.clone()),
        &config.model_path(),
    )
    .context("Failed to open link-prediction oracle")?;

    Ok(RecommenderContext::new(
        bundle.records,
        bundle.graph,
        bundle.uniques,
        oracle,
        config.ranking.clone(),
    ))
}

/// Allow-all CORS, or only the configured origins when any are listed
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if !config.server.enable_cors {
        return CorsLayer::new();
    }

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.server.cors_origins.is_empty() {
        tracing::warn!("CORS: Allowing all origins (development mode). Set cors_origins in production!");
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("CORS: Ignoring invalid origin {:?}", origin);
                None
            }
        })
        .collect();
    tracing::info!("CORS: Allowing origins: {:?}", origins);
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Application router with CORS and request tracing
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/recommend", post(api::recommend::recommend))
        .route("/recipe/:recipe_name", get(api::recipe::get_recipe))
        .route("/unique_ingredients", get(api::unique::unique_ingredients))
        .route("/unique_regions", get(api::unique::unique_regions))
        .route("/unique_countries", get(api::unique::unique_countries))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipegraph_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Recipegraph Server");
    tracing::info!("Configuration: {:#?}", config);

    config.validate()?;
    let addr = config.socket_addr()?;

    let ctx = build_context(&config)?;
    let app = build_router(AppState::new(ctx), &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Recipegraph Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    tracing::info!("HTTP server stopped");
    Ok(())
}
