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

//! Recipegraph Index
//!
//! Link-prediction oracles for the recommender:
//! - **EmbeddingLinkPredictor**: scores candidate heads with a fitted
//!   knowledge graph embedding (TransE, DistMult, RotatE, ComplEx, QuatE)
//! - **GraphLinkPredictor**: exact-match baseline over the recipe graph
//!
//! Models are fitted once and memoized on disk; see [`fit::load_or_fit`].

pub mod error;
pub mod fit;
pub mod graph_predictor;
pub mod model;
pub mod scoring;
pub mod select;

pub use error::{IndexError, Result};
pub use fit::{fit_and_save, load_or_fit, ImportedEmbeddings, ModelFitter};
pub use graph_predictor::GraphLinkPredictor;
pub use model::{EmbeddingLinkPredictor, EmbeddingModel};
pub use scoring::ScoringFunction;
pub use select::{open_oracle, OracleKind};
