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

//! Recommendation error types

use crate::oracle::OracleError;
use std::time::Duration;
use thiserror::Error;

/// Result type for recommendation operations
pub type Result<T> = std::result::Result<T, RecipeGraphError>;

/// Errors raised while building or querying the recipe graph
#[derive(Debug, Error)]
pub enum RecipeGraphError {
    /// A criterion weight was negative, NaN or infinite
    #[error("Invalid weight for '{field}': {weight}")]
    InvalidWeight { field: String, weight: f64 },

    /// The link-prediction oracle failed for one criterion
    #[error("Oracle failed for criterion ({relation}, {tail}): {source}")]
    Oracle {
        relation: String,
        tail: String,
        #[source]
        source: OracleError,
    },

    /// The link-prediction oracle did not answer in time for one criterion
    #[error("Oracle timed out after {elapsed:?} for criterion ({relation}, {tail})")]
    OracleTimeout {
        relation: String,
        tail: String,
        elapsed: Duration,
    },

    /// A spawned oracle task panicked or was cancelled
    #[error("Oracle task aborted: {0}")]
    TaskAborted(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RecipeGraphError {
    /// True when the failure came from the oracle, including timeouts
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            RecipeGraphError::Oracle { .. }
                | RecipeGraphError::OracleTimeout { .. }
                | RecipeGraphError::TaskAborted(_)
        )
    }
}

impl From<serde_json::Error> for RecipeGraphError {
    fn from(e: serde_json::Error) -> Self {
        RecipeGraphError::Serialization(e.to_string())
    }
}
