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

//! Recipegraph Core
//!
//! Recipe recommendation over a labeled knowledge graph:
//! - **Label Normalizer**: canonical entity identifiers
//! - **Graph Builder**: recipe records into a typed graph and triple list
//! - **Criterion Mapper**: user query into weighted (target, relation) criteria
//! - **Ranking**: per-criterion min-max, strict-AND merge, known-recipe filter
//! - **Info Formatter**: recipe records into display records
//!
//! ```text
//!  records ──► normalize ──► build ──► triples ──► (offline) oracle fit
//!
//!  query ──► map_query ──► criteria ──► oracle × N ──► rank ──► names
//!                                                                 │
//!                                                       format ◄──┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use recipegraph_core::{RecommenderContext, UserQuery};
//!
//! let ctx = RecommenderContext::new(records, graph, uniques, oracle, Default::default());
//! let query = UserQuery {
//!     meal_type: Some("breakfast".into()),
//!     calories: Some("low".into()),
//!     ..Default::default()
//! };
//! let names = ctx.recommend(&query).await?;
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod criteria;
pub mod entities;
pub mod error;
pub mod graph;
pub mod info;
pub mod normalize;
pub mod oracle;
pub mod ranking;
pub mod record;

// Re-exports
pub use builder::{build, GraphBuilder};
pub use config::RankingConfig;
pub use context::{RecommenderContext, UniqueValues};
pub use criteria::{map_query, Criterion, UserQuery};
pub use entities::{AttributeCategory, Entity, EntityKind, HealthKind, Relation, Triple};
pub use error::{RecipeGraphError, Result};
pub use graph::{GraphStats, RecipeGraph};
pub use info::RecipeInfo;
pub use normalize::normalize;
pub use oracle::{LinkPredictor, OracleError, Prediction};
pub use ranking::{rank, rank_scored, RankedRecipe, ScoredCandidate};
pub use record::{Nutrition, RecipeAttributes, RecipeRecord, RecordSet};
