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

//! Exact-match oracle over the recipe graph
//!
//! Needs no fitted model: candidate heads are the recipes holding the edge
//! `(head, relation, tail)`, scored by how often the fact occurred in the
//! source records.

use async_trait::async_trait;
use recipegraph_core::{Entity, LinkPredictor, OracleError, Prediction, RecipeGraph, Relation};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GraphLinkPredictor {
    graph: Arc<RecipeGraph>,
}

impl GraphLinkPredictor {
    pub fn new(graph: Arc<RecipeGraph>) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl LinkPredictor for GraphLinkPredictor {
    async fn predict(&self, relation: Relation, tail: &Entity) -> Result<Vec<Prediction>, OracleError> {
        if !self.graph.contains(tail) {
            return Err(OracleError::UnknownEntity(tail.to_string()));
        }
        Ok(self
            .graph
            .heads_for(relation, tail)
            .into_iter()
            .map(|(head, count)| Prediction::new(head.clone(), f64::from(count)))
            .collect())
    }

    fn name(&self) -> &str {
        "graph"
    }
}
