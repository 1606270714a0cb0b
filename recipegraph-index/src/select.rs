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

//! Oracle selection

use crate::error::{IndexError, Result};
use crate::graph_predictor::GraphLinkPredictor;
use crate::model::{EmbeddingLinkPredictor, EmbeddingModel};
use recipegraph_core::{LinkPredictor, RecipeGraph};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Which link-prediction backend answers ranking queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    /// Fitted embedding model loaded from disk
    #[default]
    Embedding,
    /// Exact-match lookups in the recipe graph
    Graph,
}

impl OracleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleKind::Embedding => "embedding",
            OracleKind::Graph => "graph",
        }
    }
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OracleKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedding" => Ok(OracleKind::Embedding),
            "graph" => Ok(OracleKind::Graph),
            other => Err(IndexError::InvalidModel(format!(
                "unknown oracle kind '{}' (expected embedding or graph)",
                other
            ))),
        }
    }
}

/// Open the oracle of the given kind.
///
/// The embedding oracle requires a fitted model at `model_path`; an absent
/// file is [`IndexError::MissingModel`]. The graph oracle ignores the path.
pub fn open_oracle(
    kind: OracleKind,
    graph: Arc<RecipeGraph>,
    model_path: &Path,
) -> Result<Arc<dyn LinkPredictor>> {
    let oracle: Arc<dyn LinkPredictor> = match kind {
        OracleKind::Embedding => {
            if !model_path.exists() {
                return Err(IndexError::MissingModel {
                    path: model_path.to_path_buf(),
                });
            }
            let model = EmbeddingModel::load(model_path)?;
            info!(
                "Using {} embedding oracle ({} entities, dim {})",
                model.scoring(),
                model.entity_count(),
                model.dim()
            );
            Arc::new(EmbeddingLinkPredictor::new(model))
        }
        OracleKind::Graph => {
            info!("Using exact-match graph oracle");
            Arc::new(GraphLinkPredictor::new(graph))
        }
    };
    Ok(oracle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("Graph".parse::<OracleKind>().unwrap(), OracleKind::Graph);
        assert_eq!(" embedding ".parse::<OracleKind>().unwrap(), OracleKind::Embedding);
        assert!("transe".parse::<OracleKind>().is_err());
    }

    #[test]
    fn test_missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let err = open_oracle(OracleKind::Embedding, Arc::new(RecipeGraph::new()), &path)
            .err()
            .unwrap();
        assert!(matches!(err, IndexError::MissingModel { path: p } if p == path));
    }

    #[test]
    fn test_graph_oracle_needs_no_model() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = open_oracle(
            OracleKind::Graph,
            Arc::new(RecipeGraph::new()),
            &dir.path().join("absent.bin"),
        )
        .unwrap();
        assert_eq!(oracle.name(), "graph");
    }
}
