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

//! HTTP API handlers

pub mod health;
pub mod recipe;
pub mod recommend;
pub mod unique;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recipegraph_core::{RecipeGraphError, RecommenderContext};
use serde::Serialize;
use std::sync::Arc;

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Request timeout: {0}")]
    RequestTimeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::RequestTimeout(msg) => (StatusCode::REQUEST_TIMEOUT, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<RecipeGraphError> for ApiError {
    fn from(e: RecipeGraphError) -> Self {
        match e {
            RecipeGraphError::InvalidWeight { .. } => ApiError::BadRequest(e.to_string()),
            RecipeGraphError::OracleTimeout { .. } => ApiError::RequestTimeout(e.to_string()),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<RecommenderContext>,
}

impl AppState {
    pub fn new(ctx: RecommenderContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }
}
