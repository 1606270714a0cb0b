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

//! Recipegraph CLI
//!
//! Offline batch steps and one-shot queries against a data directory.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use recipegraph_core::info as recipe_info;
use recipegraph_core::{Entity, RankingConfig, RecommenderContext, UserQuery};
use recipegraph_index::{
    fit_and_save, load_or_fit, open_oracle, ImportedEmbeddings, OracleKind, ScoringFunction,
};
use recipegraph_storage::{preprocess, ArtifactKind, ArtifactStore};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "recipegraph")]
#[command(about = "Recipegraph - knowledge graph recipe recommender", long_about = None)]
struct Cli {
    /// Artifact directory
    #[arg(short, long, default_value = "./recipegraph-data")]
    data_dir: PathBuf,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a recipe table and write every batch artifact
    Preprocess {
        /// Raw recipe CSV
        #[arg(long)]
        input: PathBuf,
    },

    /// Fit the model artifact from externally trained embeddings
    ImportEmbeddings {
        /// Entity vectors (label<TAB>v1,v2,...)
        #[arg(long)]
        entities: PathBuf,

        /// Relation vectors (label<TAB>v1,v2,...)
        #[arg(long)]
        relations: PathBuf,

        /// Scoring function the embeddings were trained with
        #[arg(long, default_value = "transe")]
        scoring: ScoringFunction,

        /// Model file (defaults to model.bin in the data directory)
        #[arg(long)]
        model_file: Option<PathBuf>,

        /// Replace an existing model instead of reusing it
        #[arg(long)]
        force: bool,
    },

    /// Rank recipes for a multi-attribute query
    Recommend {
        #[arg(long)]
        meal_type: Option<String>,

        /// Calorie level (low, high, ...)
        #[arg(long)]
        calories: Option<String>,

        #[arg(long)]
        carbs: Option<String>,

        #[arg(long)]
        protein: Option<String>,

        #[arg(long)]
        fat: Option<String>,

        #[arg(long)]
        diet_type: Option<String>,

        #[arg(long)]
        region: Option<String>,

        #[arg(long)]
        cook_time: Option<String>,

        #[arg(long)]
        country: Option<String>,

        /// Required ingredient (repeatable)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,

        /// Criterion weight as field=value (repeatable)
        #[arg(long = "weight", value_parser = parse_weight)]
        weights: Vec<(String, f64)>,

        /// Oracle backend
        #[arg(long, default_value = "embedding")]
        oracle: OracleKind,

        /// Model file (defaults to model.bin in the data directory)
        #[arg(long)]
        model_file: Option<PathBuf>,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Per-criterion oracle timeout in milliseconds
        #[arg(long, default_value = "30000")]
        timeout_ms: u64,
    },

    /// Show one recipe
    Info {
        /// Recipe name (any casing)
        name: String,
    },

    /// Show graph statistics
    Stats,

    /// List precomputed unique values
    Uniques {
        #[arg(value_enum)]
        kind: UniqueKind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UniqueKind {
    Ingredients,
    Regions,
    Countries,
}

#[derive(Serialize)]
struct ScoredName {
    name: String,
    score: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let store = ArtifactStore::new(&cli.data_dir);

    match cli.command {
        Commands::Preprocess { input } => {
            let output = preprocess(&input)
                .with_context(|| format!("Failed to preprocess {:?}", input))?;
            store.save_all(&output).context("Failed to save artifacts")?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "recipes": output.records.len(),
                        "triples": output.triples.len(),
                        "data_dir": cli.data_dir,
                    })
                );
            } else {
                println!("✓ Preprocessed {:?}", input);
                println!("  Recipes: {}", output.records.len());
                println!("  Triples: {}", output.triples.len());
                println!("  Artifacts written to {:?}", cli.data_dir);
            }
        }

        Commands::ImportEmbeddings {
            entities,
            relations,
            scoring,
            model_file,
            force,
        } => {
            let triples = store.load_triples().context("Run `recipegraph preprocess` first")?;
            let fitter = ImportedEmbeddings::new(entities, relations, scoring);
            let path = model_file.unwrap_or_else(|| store.path(ArtifactKind::Model));

            let model = if force {
                fit_and_save(&path, &triples, &fitter)?
            } else {
                load_or_fit(&path, &triples, &fitter)?
            };

            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "model": path,
                        "scoring": model.scoring().as_str(),
                        "dim": model.dim(),
                        "entities": model.entity_count(),
                        "relations": model.relation_count(),
                    })
                );
            } else {
                println!("✓ Model ready at {:?}", path);
                println!(
                    "  {} embeddings, dim {}, {} entities, {} relations",
                    model.scoring(),
                    model.dim(),
                    model.entity_count(),
                    model.relation_count()
                );
            }
        }

        Commands::Recommend {
            meal_type,
            calories,
            carbs,
            protein,
            fat,
            diet_type,
            region,
            cook_time,
            country,
            ingredients,
            weights,
            oracle,
            model_file,
            limit,
            timeout_ms,
        } => {
            let query = UserQuery {
                meal_type,
                calories,
                carbs,
                protein,
                fat,
                diet_type,
                region,
                cook_time,
                ingredients: (!ingredients.is_empty()).then_some(ingredients),
                country,
                weights: weights.into_iter().collect::<HashMap<_, _>>(),
            };
            let ranking = RankingConfig {
                oracle_timeout_ms: timeout_ms,
                max_results: limit,
            };
            let model_path = model_file.unwrap_or_else(|| store.path(ArtifactKind::Model));
            let ctx = open_context(&store, oracle, &model_path, ranking)?;

            let ranked = ctx.recommend_scored(&query).await?;
            info!("Ranked {} recipes", ranked.len());

            if cli.json {
                let rows: Vec<ScoredName> = ranked
                    .into_iter()
                    .map(|r| ScoredName {
                        name: r.entity.into_string(),
                        score: r.score,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if ranked.is_empty() {
                println!("No recipes match every criterion");
            } else {
                for (i, r) in ranked.iter().enumerate() {
                    println!("{:>3}. {:<40} {:.4}", i + 1, r.entity, r.score);
                }
            }
        }

        Commands::Info { name } => {
            let records = store.load_records().context("Failed to load records")?;
            let info = recipe_info::format(&Entity::new(&name), &records)
                .with_context(|| format!("Recipe not found: {}", name))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", info.name);
                println!("{}", "=".repeat(info.name.chars().count()));
                println!("{}", info.description);
                println!();
                println!("Meal type:   {}", info.meal_type.join(", "));
                println!("Diet type:   {}", info.diet_type.join(", "));
                println!("Health:      {}", info.health_type.join(", "));
                println!("Region:      {}", info.region.join(", "));
                println!("Country:     {}", info.country.join(", "));
                println!("Cook time:   {}", info.cook_time);
                println!();
                println!("Ingredients:");
                for ingredient in &info.ingredients {
                    println!("  - {}", ingredient);
                }
                println!();
                println!("Nutrition:");
                for (key, value) in &info.nutrition_facts {
                    println!("  {:<22} {}", key, value);
                }
                println!();
                println!("{}", info.instructions);
            }
        }

        Commands::Stats => {
            let graph = store.load_graph().context("Failed to load graph")?;
            let stats = graph.stats();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Recipegraph Statistics");
                println!("======================");
                println!();
                println!("Nodes:         {}", stats.node_count);
                println!("Relationships: {}", stats.relationship_count);
                println!("Recipes:       {}", stats.recipe_count);
                println!(
                    "Avg attributes per recipe: {:.2}",
                    stats.avg_attributes_per_recipe
                );
                println!();
                println!("Relations:");
                let mut relations: Vec<_> = stats.relation_distribution.iter().collect();
                relations.sort();
                for (relation, count) in relations {
                    println!("  {:<24} {}", relation, count);
                }
            }
        }

        Commands::Uniques { kind } => {
            let uniques = store.load_uniques().context("Failed to load unique values")?;
            let values = match kind {
                UniqueKind::Ingredients => uniques.ingredients,
                UniqueKind::Regions => uniques.regions,
                UniqueKind::Countries => uniques.countries,
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                for value in values.iter().filter(|v| !v.is_empty()) {
                    println!("{}", value);
                }
            }
        }
    }

    Ok(())
}

fn open_context(
    store: &ArtifactStore,
    kind: OracleKind,
    model_path: &std::path::Path,
    ranking: RankingConfig,
) -> Result<RecommenderContext> {
    let bundle = store.load_bundle().context("Failed to load artifacts")?;
    let oracle = open_oracle(kind, Arc::new(bundle.graph.clone()), model_path)
        .context("Failed to open oracle")?;
    Ok(RecommenderContext::new(
        bundle.records,
        bundle.graph,
        bundle.uniques,
        oracle,
        ranking,
    ))
}

fn parse_weight(s: &str) -> std::result::Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", s))?;
    let weight = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid weight '{}': {}", value, e))?;
    Ok((key.trim().to_string(), weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("calories=2.5").unwrap(), ("calories".into(), 2.5));
        assert!(parse_weight("calories").is_err());
        assert!(parse_weight("calories=lots").is_err());
    }

    #[test]
    fn test_recommend_args() {
        let cli = Cli::try_parse_from([
            "recipegraph",
            "--json",
            "recommend",
            "--meal-type",
            "breakfast",
            "--ingredient",
            "egg",
            "--ingredient",
            "chive",
            "--weight",
            "ingredients=0.5",
            "--oracle",
            "graph",
            "--limit",
            "5",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Recommend {
                meal_type,
                ingredients,
                weights,
                oracle,
                limit,
                ..
            } => {
                assert_eq!(meal_type.as_deref(), Some("breakfast"));
                assert_eq!(ingredients, vec!["egg", "chive"]);
                assert_eq!(weights, vec![("ingredients".to_string(), 0.5)]);
                assert_eq!(oracle, OracleKind::Graph);
                assert_eq!(limit, Some(5));
            }
            _ => panic!("expected recommend"),
        }
    }
}
