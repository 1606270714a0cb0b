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

//! Batch artifacts
//!
//! Everything the offline preprocessing step produces and the service loads
//! at startup, stored under one data directory:
//!
//! | Artifact | File | Encoding |
//! |----------|------|----------|
//! | triple table | `triples.csv` | CSV, header `Head,Relation,Tail` |
//! | recipe graph | `graph.bin` | bincode |
//! | recipe records | `records.bin` | bincode |
//! | per-recipe attributes | `recipes_dict.bin` | bincode |
//! | unique ingredients / regions / countries | `unique_*.bin` | bincode |
//!
//! Writes go to a temporary file that is renamed into place.

use crate::error::{Result, StorageError};
use crate::ingest;
use recipegraph_core::{
    build, Entity, RecipeAttributes, RecipeGraph, RecordSet, Relation, Triple, UniqueValues,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Artifact types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Triples,
    Graph,
    Records,
    RecipesDict,
    UniqueIngredients,
    UniqueRegions,
    UniqueCountries,
    /// Fitted link-prediction model
    Model,
}

impl ArtifactKind {
    /// Artifacts written by preprocessing, in write order
    pub const BATCH: [ArtifactKind; 7] = [
        ArtifactKind::Triples,
        ArtifactKind::Graph,
        ArtifactKind::Records,
        ArtifactKind::RecipesDict,
        ArtifactKind::UniqueIngredients,
        ArtifactKind::UniqueRegions,
        ArtifactKind::UniqueCountries,
    ];

    /// Default file name inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Triples => "triples.csv",
            ArtifactKind::Graph => "graph.bin",
            ArtifactKind::Records => "records.bin",
            ArtifactKind::RecipesDict => "recipes_dict.bin",
            ArtifactKind::UniqueIngredients => "unique_ingredients.bin",
            ArtifactKind::UniqueRegions => "unique_regions.bin",
            ArtifactKind::UniqueCountries => "unique_countries.bin",
            ArtifactKind::Model => "model.bin",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::Triples => "triples",
            ArtifactKind::Graph => "graph",
            ArtifactKind::Records => "records",
            ArtifactKind::RecipesDict => "recipes dictionary",
            ArtifactKind::UniqueIngredients => "unique ingredients",
            ArtifactKind::UniqueRegions => "unique regions",
            ArtifactKind::UniqueCountries => "unique countries",
            ArtifactKind::Model => "model",
        };
        f.write_str(label)
    }
}

/// Row of the triple table
#[derive(Debug, Serialize, Deserialize)]
struct TripleRow {
    #[serde(rename = "Head")]
    head: Entity,
    #[serde(rename = "Relation")]
    relation: Relation,
    #[serde(rename = "Tail")]
    tail: Entity,
}

/// Output of the preprocessing step
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub records: RecordSet,
    pub graph: RecipeGraph,
    /// Flat triples in encounter order, duplicates kept
    pub triples: Vec<Triple>,
    pub recipes_dict: BTreeMap<Entity, RecipeAttributes>,
    pub uniques: UniqueValues,
}

/// What the service needs at startup
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub records: RecordSet,
    pub graph: RecipeGraph,
    pub uniques: UniqueValues,
}

/// Ingest a recipe table and build every batch artifact in memory
pub fn preprocess(csv_path: impl AsRef<Path>) -> Result<BatchOutput> {
    let records = ingest::read_records_from_path(csv_path)?;
    Ok(preprocess_records(records))
}

/// Build every batch artifact from already-ingested records
pub fn preprocess_records(records: RecordSet) -> BatchOutput {
    let (graph, triples) = build(records.iter());
    let recipes_dict = records.attributes_by_name();
    let uniques = ingest::unique_values(&records);
    BatchOutput {
        records,
        graph,
        triples,
        recipes_dict,
        uniques,
    }
}

/// Reads and writes artifacts under one data directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    pub fn exists(&self, kind: ArtifactKind) -> bool {
        self.path(kind).is_file()
    }

    fn open(&self, kind: ArtifactKind) -> Result<BufReader<File>> {
        let path = self.path(kind);
        if !path.is_file() {
            return Err(StorageError::MissingArtifact { kind, path });
        }
        Ok(BufReader::new(File::open(&path)?))
    }

    /// Write through a temporary file renamed into place
    fn write_atomic<F>(&self, kind: ArtifactKind, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        create_dir_all(&self.root)?;
        let path = self.path(kind);
        let temp_path = path.with_extension("tmp");

        let written = (|| -> Result<()> {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush()?;
            std::fs::rename(&temp_path, &path)?;
            Ok(())
        })();
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }

        debug!("Wrote {} to {}", kind, path.display());
        Ok(())
    }

    pub fn save_blob<T: Serialize>(&self, kind: ArtifactKind, value: &T) -> Result<()> {
        self.write_atomic(kind, |writer| Ok(bincode::serialize_into(writer, value)?))
    }

    pub fn load_blob<T: DeserializeOwned>(&self, kind: ArtifactKind) -> Result<T> {
        let reader = self.open(kind)?;
        Ok(bincode::deserialize_from(reader)?)
    }

    pub fn save_triples(&self, triples: &[Triple]) -> Result<()> {
        self.write_atomic(ArtifactKind::Triples, |writer| {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for triple in triples {
                csv_writer.serialize(TripleRow {
                    head: triple.head.clone(),
                    relation: triple.relation,
                    tail: triple.tail.clone(),
                })?;
            }
            csv_writer.flush()?;
            Ok(())
        })
    }

    pub fn load_triples(&self) -> Result<Vec<Triple>> {
        let reader = self.open(ArtifactKind::Triples)?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut triples = Vec::new();
        for row in csv_reader.deserialize::<TripleRow>() {
            let row = row?;
            triples.push(Triple::new(row.head, row.relation, row.tail));
        }
        Ok(triples)
    }

    pub fn load_graph(&self) -> Result<RecipeGraph> {
        self.load_blob(ArtifactKind::Graph)
    }

    pub fn load_records(&self) -> Result<RecordSet> {
        self.load_blob(ArtifactKind::Records)
    }

    pub fn load_recipes_dict(&self) -> Result<BTreeMap<Entity, RecipeAttributes>> {
        self.load_blob(ArtifactKind::RecipesDict)
    }

    pub fn load_uniques(&self) -> Result<UniqueValues> {
        Ok(UniqueValues {
            ingredients: self.load_blob(ArtifactKind::UniqueIngredients)?,
            regions: self.load_blob(ArtifactKind::UniqueRegions)?,
            countries: self.load_blob(ArtifactKind::UniqueCountries)?,
        })
    }

    /// Persist every batch artifact
    pub fn save_all(&self, output: &BatchOutput) -> Result<()> {
        self.save_triples(&output.triples)?;
        self.save_blob(ArtifactKind::Graph, &output.graph)?;
        self.save_blob(ArtifactKind::Records, &output.records)?;
        self.save_blob(ArtifactKind::RecipesDict, &output.recipes_dict)?;
        self.save_blob(ArtifactKind::UniqueIngredients, &output.uniques.ingredients)?;
        self.save_blob(ArtifactKind::UniqueRegions, &output.uniques.regions)?;
        self.save_blob(ArtifactKind::UniqueCountries, &output.uniques.countries)?;

        info!(
            "Saved {} artifacts to {} ({} recipes, {} triples)",
            ArtifactKind::BATCH.len(),
            self.root.display(),
            output.records.len(),
            output.triples.len()
        );
        Ok(())
    }

    /// Load everything the service needs; any absent artifact is fatal
    pub fn load_bundle(&self) -> Result<ArtifactBundle> {
        if let Some(kind) = ArtifactKind::BATCH.into_iter().find(|k| !self.exists(*k)) {
            return Err(StorageError::MissingArtifact {
                kind,
                path: self.path(kind),
            });
        }

        let bundle = ArtifactBundle {
            records: self.load_records()?,
            graph: self.load_graph()?,
            uniques: self.load_uniques()?,
        };
        info!(
            "Loaded artifacts from {}: {} recipes, {} graph nodes",
            self.root.display(),
            bundle.records.len(),
            bundle.graph.node_count()
        );
        Ok(bundle)
    }
}
