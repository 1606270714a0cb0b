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

//! Embedding model artifact and the oracle backed by it
//!
//! A fitted model is a scoring function plus one vector per entity and per
//! relation. Prediction scores every known entity as a candidate head for a
//! `(relation, tail)` query, so non-recipe heads come back too; the ranker
//! filters them out.

use crate::error::{IndexError, Result};
use crate::scoring::ScoringFunction;
use async_trait::async_trait;
use recipegraph_core::{Entity, LinkPredictor, OracleError, Prediction, Relation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Fitted knowledge graph embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ModelPersistence")]
pub struct EmbeddingModel {
    scoring: ScoringFunction,
    dim: usize,
    entities: Vec<Entity>,
    entity_vectors: Vec<Vec<f32>>,
    relation_vectors: BTreeMap<Relation, Vec<f32>>,
    #[serde(skip_serializing)]
    index: HashMap<Entity, usize>,
}

/// Persistence format; the entity index is rebuilt on load
#[derive(Deserialize)]
struct ModelPersistence {
    scoring: ScoringFunction,
    dim: usize,
    entities: Vec<Entity>,
    entity_vectors: Vec<Vec<f32>>,
    relation_vectors: BTreeMap<Relation, Vec<f32>>,
}

impl TryFrom<ModelPersistence> for EmbeddingModel {
    type Error = IndexError;

    /// Persisted models go through the same validation as fresh ones
    fn try_from(data: ModelPersistence) -> Result<Self> {
        if data.entities.len() != data.entity_vectors.len() {
            return Err(IndexError::InvalidModel(format!(
                "{} labels but {} vectors",
                data.entities.len(),
                data.entity_vectors.len()
            )));
        }
        let entities = data.entities.into_iter().zip(data.entity_vectors).collect();
        Self::new(data.scoring, data.dim, entities, data.relation_vectors)
    }
}

fn index_of(entities: &[Entity]) -> HashMap<Entity, usize> {
    entities
        .iter()
        .enumerate()
        .map(|(i, e)| (e.clone(), i))
        .collect()
}

fn check_dim(label: &str, vector: &[f32], dim: usize) -> Result<()> {
    if vector.len() != dim {
        return Err(IndexError::DimensionMismatch {
            label: label.to_string(),
            expected: dim,
            found: vector.len(),
        });
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(IndexError::InvalidModel(format!(
            "non-finite component in embedding for '{}'",
            label
        )));
    }
    Ok(())
}

impl EmbeddingModel {
    /// Assemble and validate a model
    pub fn new(
        scoring: ScoringFunction,
        dim: usize,
        entities: Vec<(Entity, Vec<f32>)>,
        relations: BTreeMap<Relation, Vec<f32>>,
    ) -> Result<Self> {
        if dim == 0 || dim % scoring.components() != 0 {
            return Err(IndexError::InvalidModel(format!(
                "dimension {} is not a positive multiple of {} for {}",
                dim,
                scoring.components(),
                scoring
            )));
        }

        let mut labels = Vec::with_capacity(entities.len());
        let mut vectors = Vec::with_capacity(entities.len());
        for (entity, vector) in entities {
            check_dim(entity.as_str(), &vector, dim)?;
            labels.push(entity);
            vectors.push(vector);
        }
        for (relation, vector) in &relations {
            check_dim(relation.as_str(), vector, dim)?;
        }

        let index = index_of(&labels);
        if index.len() != labels.len() {
            return Err(IndexError::InvalidModel("duplicate entity label".into()));
        }

        Ok(Self {
            scoring,
            dim,
            entities: labels,
            entity_vectors: vectors,
            relation_vectors: relations,
            index,
        })
    }

    pub fn scoring(&self) -> ScoringFunction {
        self.scoring
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relation_vectors.len()
    }

    pub fn contains_entity(&self, entity: &Entity) -> bool {
        self.index.contains_key(entity)
    }

    pub fn contains_relation(&self, relation: Relation) -> bool {
        self.relation_vectors.contains_key(&relation)
    }

    /// Score every entity as the head of `(?, relation, tail)`
    pub fn predict_heads(
        &self,
        relation: Relation,
        tail: &Entity,
    ) -> std::result::Result<Vec<Prediction>, OracleError> {
        let &tail_idx = self
            .index
            .get(tail)
            .ok_or_else(|| OracleError::UnknownEntity(tail.to_string()))?;
        let rel = self
            .relation_vectors
            .get(&relation)
            .ok_or_else(|| OracleError::UnknownRelation(relation.to_string()))?;
        let tail_vec = &self.entity_vectors[tail_idx];

        Ok(self
            .entities
            .iter()
            .zip(&self.entity_vectors)
            .map(|(entity, head_vec)| {
                let score = self.scoring.score(head_vec, rel, tail_vec);
                Prediction::new(entity.clone(), f64::from(score))
            })
            .collect())
    }

    /// Save atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let written = (|| -> Result<()> {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            bincode::serialize_into(&mut writer, self)?;
            writer.flush()?;
            std::fs::rename(&temp_path, path)?;
            Ok(())
        })();
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }

        info!(
            "Saved {} model ({} entities, dim {}) to {}",
            self.scoring,
            self.entity_count(),
            self.dim,
            path.display()
        );
        Ok(())
    }

    /// Load and validate a saved model
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let data: ModelPersistence = bincode::deserialize_from(BufReader::new(file))?;
        let model = Self::try_from(data)?;
        debug!(
            "Loaded {} model with {} entities from {}",
            model.scoring,
            model.entity_count(),
            path.display()
        );
        Ok(model)
    }
}

/// Oracle over a fitted embedding model; scoring runs on the blocking pool
#[derive(Debug, Clone)]
pub struct EmbeddingLinkPredictor {
    model: Arc<EmbeddingModel>,
}

impl EmbeddingLinkPredictor {
    pub fn new(model: EmbeddingModel) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    pub fn model(&self) -> &EmbeddingModel {
        &self.model
    }
}

#[async_trait]
impl LinkPredictor for EmbeddingLinkPredictor {
    async fn predict(
        &self,
        relation: Relation,
        tail: &Entity,
    ) -> std::result::Result<Vec<Prediction>, OracleError> {
        let model = Arc::clone(&self.model);
        let tail = tail.clone();
        tokio::task::spawn_blocking(move || model.predict_heads(relation, &tail))
            .await
            .map_err(|e| OracleError::Backend(format!("scoring task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        "embedding"
    }
}
