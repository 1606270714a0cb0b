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

//! Link-prediction oracle interface
//!
//! The ranker treats the oracle as a black box: given `(relation, tail)` it
//! returns candidate heads with raw plausibility scores on an
//! oracle-defined scale.

use crate::entities::{Entity, Relation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A candidate head with its raw score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub head: Entity,
    pub score: f64,
}

impl Prediction {
    pub fn new(head: Entity, score: f64) -> Self {
        Self { head, score }
    }
}

/// Errors reported by an oracle backend
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// The tail entity is not part of the fitted space
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// The relation is not part of the fitted space
    #[error("Unknown relation: {0}")]
    UnknownRelation(String),

    /// The backend produced a NaN or infinite score
    #[error("Non-finite score for head '{head}'")]
    NonFiniteScore { head: String },

    /// Any other backend failure
    #[error("Oracle backend error: {0}")]
    Backend(String),
}

/// Predicts candidate heads for a `(relation, tail)` query
#[async_trait]
pub trait LinkPredictor: Send + Sync {
    /// Every candidate head with its raw score, in any order
    async fn predict(&self, relation: Relation, tail: &Entity) -> Result<Vec<Prediction>, OracleError>;

    /// Short backend name for logs and health output
    fn name(&self) -> &str {
        "oracle"
    }
}
