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

//! Memoized model fitting
//!
//! A fitted model is persisted once and reused on every later start. This
//! crate does not train: the shipped [`ModelFitter`] imports embeddings
//! exported by an external trainer and checks that they cover the triple set.

use crate::error::{IndexError, Result};
use crate::model::EmbeddingModel;
use crate::scoring::ScoringFunction;
use recipegraph_core::{Entity, Relation, Triple};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Produces a model from the full triple set
pub trait ModelFitter: Send + Sync {
    fn fit(&self, triples: &[Triple]) -> Result<EmbeddingModel>;

    /// Fitter name for logs
    fn name(&self) -> &str;
}

/// Load the model at `path`, or fit and persist it when absent
pub fn load_or_fit(path: &Path, triples: &[Triple], fitter: &dyn ModelFitter) -> Result<EmbeddingModel> {
    if path.is_file() {
        info!("Reusing fitted model at {}", path.display());
        return EmbeddingModel::load(path);
    }
    fit_and_save(path, triples, fitter)
}

/// Fit unconditionally and overwrite any model at `path`
pub fn fit_and_save(path: &Path, triples: &[Triple], fitter: &dyn ModelFitter) -> Result<EmbeddingModel> {
    info!(
        "Fitting model with {} from {} triples",
        fitter.name(),
        triples.len()
    );
    let model = fitter.fit(triples)?;
    model.save(path)?;
    Ok(model)
}

/// Embeddings exported by an external trainer.
///
/// Both files hold one `label<TAB>v1,v2,...` line per entity or relation.
/// Blank lines and lines starting with `#` are ignored.
#[derive(Debug, Clone)]
pub struct ImportedEmbeddings {
    pub entities_path: PathBuf,
    pub relations_path: PathBuf,
    pub scoring: ScoringFunction,
}

impl ImportedEmbeddings {
    pub fn new(
        entities_path: impl Into<PathBuf>,
        relations_path: impl Into<PathBuf>,
        scoring: ScoringFunction,
    ) -> Self {
        Self {
            entities_path: entities_path.into(),
            relations_path: relations_path.into(),
            scoring,
        }
    }
}

/// Parse `label<TAB>v1,v2,...` lines
pub fn parse_vectors(text: &str) -> Result<Vec<(String, Vec<f32>)>> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (label, values) = line.split_once('\t').ok_or_else(|| {
            IndexError::InvalidModel(format!("line {}: expected label<TAB>vector", lineno + 1))
        })?;
        let vector = values
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| IndexError::InvalidModel(format!("line {}: {}", lineno + 1, e)))?;
        out.push((label.trim().to_string(), vector));
    }
    Ok(out)
}

impl ModelFitter for ImportedEmbeddings {
    fn fit(&self, triples: &[Triple]) -> Result<EmbeddingModel> {
        let entities: Vec<(Entity, Vec<f32>)> = parse_vectors(&fs::read_to_string(&self.entities_path)?)?
            .into_iter()
            .map(|(label, v)| (Entity::verbatim(label), v))
            .collect();

        let mut relations = BTreeMap::new();
        for (label, v) in parse_vectors(&fs::read_to_string(&self.relations_path)?)? {
            let relation: Relation = label
                .parse()
                .map_err(|e| IndexError::InvalidModel(format!("{}", e)))?;
            relations.insert(relation, v);
        }

        let dim = entities
            .first()
            .map(|(_, v)| v.len())
            .ok_or_else(|| IndexError::InvalidModel("no entity embeddings".into()))?;

        let known: HashSet<&Entity> = entities.iter().map(|(e, _)| e).collect();
        for triple in triples {
            for entity in [&triple.head, &triple.tail] {
                if !known.contains(entity) {
                    return Err(IndexError::MissingEmbedding {
                        kind: "entity",
                        label: entity.to_string(),
                    });
                }
            }
            if !relations.contains_key(&triple.relation) {
                return Err(IndexError::MissingEmbedding {
                    kind: "relation",
                    label: triple.relation.to_string(),
                });
            }
        }

        EmbeddingModel::new(self.scoring, dim, entities, relations)
    }

    fn name(&self) -> &str {
        "imported embeddings"
    }
}
