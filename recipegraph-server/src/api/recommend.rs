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

use axum::{extract::State, Json};
use recipegraph_core::UserQuery;
use tracing::{debug, warn};

use crate::api::{ApiError, AppState};

/// POST /recommend - Ranked recipe names for a multi-attribute query
pub async fn recommend(
    State(state): State<AppState>,
    Json(query): Json<UserQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    debug!("Recommendation query: {:?}", query);

    let names = state.ctx.recommend(&query).await.map_err(|e| {
        warn!("Recommendation failed: {}", e);
        ApiError::from(e)
    })?;

    debug!("Returning {} recommendations", names.len());
    Ok(Json(names))
}
