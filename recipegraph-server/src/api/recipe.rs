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

use axum::{
    extract::{Path, State},
    Json,
};
use recipegraph_core::RecipeInfo;

use crate::api::{ApiError, AppState};

/// GET /recipe/:recipe_name - Display record of one recipe
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(recipe_name): Path<String>,
) -> Result<Json<RecipeInfo>, ApiError> {
    state
        .ctx
        .recipe_info(&recipe_name)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
}
