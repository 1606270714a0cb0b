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

//! Artifact round trips through a temporary data directory.

use recipegraph_core::{Entity, Relation};
use recipegraph_storage::{preprocess, ArtifactKind, ArtifactStore, StorageError};
use std::fs;
use tempfile::TempDir;

const TABLE: &str = "\
Name,Best_foodentityname,ScrapedIngredients,Healthy_Type,meal_type,Diet_Types,RegionPart,CountryPart,cook_time,Description,RecipeInstructions,Images,Calories
Shakshuka,\"egg,tomato,egg\",\"4 eggs, 1 can tomatoes\",\"high_protein,low_saturated_fat\",breakfast,Vegetarian,Middle East,Israel,30 mins,Eggs poached in sauce,Simmer then crack eggs,\"[['s.jpg']]\",310
Ramen,\"noodle,egg\",noodles,,dinner,Unknown,East Asia,Japan,>60 mins,,Boil,,540
";

fn write_table(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("recipes.csv");
    fs::write(&path, TABLE).unwrap();
    path
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let output = preprocess(write_table(&dir)).unwrap();
    let store = ArtifactStore::new(dir.path().join("data"));

    store.save_all(&output).unwrap();
    for kind in ArtifactKind::BATCH {
        assert!(store.exists(kind), "{} not written", kind);
    }

    let triples = store.load_triples().unwrap();
    assert_eq!(triples, output.triples);
    // duplicate fact survives in the flat table
    let egg_facts = triples
        .iter()
        .filter(|t| t.head.as_str() == "shakshuka" && t.tail.as_str() == "egg")
        .count();
    assert_eq!(egg_facts, 2);

    let bundle = store.load_bundle().unwrap();
    assert_eq!(bundle.records.len(), 2);
    assert_eq!(bundle.graph.triples(), output.graph.triples());
    assert_eq!(bundle.uniques, output.uniques);
    assert_eq!(store.load_recipes_dict().unwrap(), output.recipes_dict);

    let shakshuka = bundle.records.get(&Entity::new("Shakshuka")).unwrap();
    assert_eq!(shakshuka.description.as_deref(), Some("Eggs poached in sauce"));
    assert_eq!(shakshuka.nutrition.calories, Some(310.0));
}

#[test]
fn test_triple_table_format() {
    let dir = TempDir::new().unwrap();
    let output = preprocess(write_table(&dir)).unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save_triples(&output.triples).unwrap();

    let text = fs::read_to_string(store.path(ArtifactKind::Triples)).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Head,Relation,Tail"));
    assert_eq!(lines.next(), Some("shakshuka,contains,egg"));
    assert!(text.contains("shakshuka,HasSaturatedFatLevel,low_saturated_fat"));
    assert!(text.contains("ramen,needTimeToCook,60_mins"));
    // unknown diet type never reaches the table
    assert!(!text.contains("unknown"));

    let hs = output
        .triples
        .iter()
        .find(|t| t.relation == Relation::HasProteinLevel)
        .unwrap();
    assert_eq!(hs.tail.as_str(), "high_protein");
}

#[test]
fn test_missing_artifact_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());

    match store.load_bundle() {
        Err(StorageError::MissingArtifact { kind, path }) => {
            assert_eq!(kind, ArtifactKind::Triples);
            assert_eq!(path, dir.path().join("triples.csv"));
        }
        other => panic!("expected missing artifact, got {:?}", other.map(|_| ())),
    }

    assert!(matches!(
        store.load_graph(),
        Err(StorageError::MissingArtifact { kind: ArtifactKind::Graph, .. })
    ));
}

#[test]
fn test_no_temp_files_left_behind() {
    let dir = TempDir::new().unwrap();
    let output = preprocess(write_table(&dir)).unwrap();
    let store = ArtifactStore::new(dir.path().join("data"));
    store.save_all(&output).unwrap();

    let leftovers: Vec<_> = fs::read_dir(store.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_failed_write_removes_temp_file() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    fs::create_dir(store.path(ArtifactKind::Graph)).unwrap();

    let result = store.save_blob(ArtifactKind::UniqueRegions, &vec![String::new()]);
    assert!(result.is_ok());

    let err = store.save_blob(ArtifactKind::Graph, &vec!["graph".to_string()]);
    assert!(err.is_err());
    assert!(!dir.path().join("graph.tmp").exists());
}
