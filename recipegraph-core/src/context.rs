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

//! Recommender service context
//!
//! Everything a query needs (records, graph, unique-value lists, oracle and
//! ranking config) is assembled once at startup and never mutated. Share it
//! through an `Arc`; concurrent queries need no locking.

use crate::config::RankingConfig;
use crate::criteria::{map_query, UserQuery};
use crate::entities::Entity;
use crate::error::Result;
use crate::graph::{GraphStats, RecipeGraph};
use crate::info::{self, RecipeInfo};
use crate::oracle::LinkPredictor;
use crate::ranking::{rank_scored, RankedRecipe};
use crate::record::RecordSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Precomputed enumeration lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniqueValues {
    /// Sorted distinct ingredients
    pub ingredients: Vec<String>,
    /// `""` followed by sorted distinct regions
    pub regions: Vec<String>,
    /// `""` followed by sorted distinct countries
    pub countries: Vec<String>,
}

/// Immutable recommender state
pub struct RecommenderContext {
    records: RecordSet,
    graph: RecipeGraph,
    uniques: UniqueValues,
    valid: HashSet<Entity>,
    oracle: Arc<dyn LinkPredictor>,
    config: RankingConfig,
}

impl RecommenderContext {
    pub fn new(
        records: RecordSet,
        graph: RecipeGraph,
        uniques: UniqueValues,
        oracle: Arc<dyn LinkPredictor>,
        config: RankingConfig,
    ) -> Self {
        let valid = records.names();
        info!(
            "Recommender ready: {} recipes, {} graph nodes, oracle '{}'",
            records.len(),
            graph.node_count(),
            oracle.name()
        );
        Self {
            records,
            graph,
            uniques,
            valid,
            oracle,
            config,
        }
    }

    /// Ranked recipes with their summed scores
    pub async fn recommend_scored(&self, query: &UserQuery) -> Result<Vec<RankedRecipe>> {
        let criteria = map_query(query)?;
        if criteria.is_empty() {
            debug!("Query has no criteria, nothing to rank");
            return Ok(Vec::new());
        }
        rank_scored(&criteria, Arc::clone(&self.oracle), &self.valid, &self.config).await
    }

    /// Ranked recipe identifiers, highest confidence first
    pub async fn recommend(&self, query: &UserQuery) -> Result<Vec<String>> {
        Ok(self
            .recommend_scored(query)
            .await?
            .into_iter()
            .map(|r| r.entity.into_string())
            .collect())
    }

    /// Display record for a recipe name in any casing or punctuation
    pub fn recipe_info(&self, name: &str) -> Option<RecipeInfo> {
        info::format(&Entity::new(name), &self.records)
    }

    pub fn unique_ingredients(&self) -> &[String] {
        &self.uniques.ingredients
    }

    pub fn unique_regions(&self) -> &[String] {
        &self.uniques.regions
    }

    pub fn unique_countries(&self) -> &[String] {
        &self.uniques.countries
    }

    pub fn graph_stats(&self) -> GraphStats {
        self.graph.stats()
    }

    pub fn recipe_count(&self) -> usize {
        self.records.len()
    }

    /// Number of distinct facts in the graph
    pub fn triple_count(&self) -> usize {
        self.graph.relationship_count()
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }
}
