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

use crate::api::AppState;

/// GET /unique_ingredients
pub async fn unique_ingredients(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.ctx.unique_ingredients().to_vec())
}

/// GET /unique_regions - first entry is `""` (unspecified)
pub async fn unique_regions(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.ctx.unique_regions().to_vec())
}

/// GET /unique_countries - first entry is `""` (unspecified)
pub async fn unique_countries(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.ctx.unique_countries().to_vec())
}
