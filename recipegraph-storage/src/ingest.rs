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

//! Raw recipe table ingestion
//!
//! Reads the headered recipe CSV and cleans it into normalized
//! [`RecipeRecord`]s. Missing columns and empty cells read as empty values;
//! duplicate recipe names keep their first row.

use crate::error::Result;
use recipegraph_core::{Entity, Nutrition, RecipeRecord, RecordSet, UniqueValues};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// One row of the raw recipe table, as found on disk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecipeRow {
    #[serde(rename = "Name")]
    pub name: String,
    /// Canonical ingredient names used for the graph
    #[serde(rename = "Best_foodentityname")]
    pub best_food_entity_name: String,
    /// Free-text ingredient list used for display
    #[serde(rename = "ScrapedIngredients")]
    pub scraped_ingredients: String,
    #[serde(rename = "Healthy_Type")]
    pub healthy_type: String,
    pub meal_type: String,
    #[serde(rename = "Diet_Types")]
    pub diet_types: String,
    #[serde(rename = "RegionPart")]
    pub region_part: String,
    #[serde(rename = "CountryPart")]
    pub country_part: String,
    pub cook_time: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "RecipeInstructions")]
    pub recipe_instructions: String,
    #[serde(rename = "Images")]
    pub images: String,
    #[serde(rename = "Calories")]
    pub calories: String,
    #[serde(rename = "FatContent")]
    pub fat_content: String,
    #[serde(rename = "SaturatedFatContent")]
    pub saturated_fat_content: String,
    #[serde(rename = "CholesterolContent")]
    pub cholesterol_content: String,
    #[serde(rename = "SodiumContent")]
    pub sodium_content: String,
    #[serde(rename = "CarbohydrateContent")]
    pub carbohydrate_content: String,
    #[serde(rename = "FiberContent")]
    pub fiber_content: String,
    #[serde(rename = "SugarContent")]
    pub sugar_content: String,
    #[serde(rename = "ProteinContent")]
    pub protein_content: String,
}

/// Split a comma-separated cell into normalized entities, dropping blanks
pub fn split_list(cell: &str) -> Vec<Entity> {
    cell.split(',')
        .map(Entity::new)
        .filter(|e| !e.as_str().is_empty())
        .collect()
}

fn optional_text(cell: String) -> Option<String> {
    if cell.trim().is_empty() {
        None
    } else {
        Some(cell)
    }
}

fn number(column: &str, cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            debug!("Ignoring non-numeric {} value: {:?}", column, cell);
            None
        }
    }
}

impl RawRecipeRow {
    /// Clean the row into a normalized record
    pub fn into_record(self) -> RecipeRecord {
        let mut record = RecipeRecord::new(&self.name);
        let attrs = &mut record.attributes;
        attrs.ingredients = split_list(&self.best_food_entity_name);
        attrs.diet_types = split_list(&self.diet_types);
        attrs.meal_type = split_list(&self.meal_type);
        attrs.cook_time = Entity::new(&self.cook_time);
        attrs.regions = split_list(&self.region_part);
        attrs.countries = split_list(&self.country_part);
        attrs.healthy_types = split_list(&self.healthy_type);

        record.nutrition = Nutrition {
            calories: number("Calories", &self.calories),
            fat: number("FatContent", &self.fat_content),
            saturated_fat: number("SaturatedFatContent", &self.saturated_fat_content),
            cholesterol: number("CholesterolContent", &self.cholesterol_content),
            sodium: number("SodiumContent", &self.sodium_content),
            carbohydrate: number("CarbohydrateContent", &self.carbohydrate_content),
            fiber: number("FiberContent", &self.fiber_content),
            sugar: number("SugarContent", &self.sugar_content),
            protein: number("ProteinContent", &self.protein_content),
        };

        record.display_ingredients = self.scraped_ingredients;
        record.description = optional_text(self.description);
        record.instructions = self.recipe_instructions;
        record.images = optional_text(self.images);
        record
    }
}

/// Read and clean a recipe table
pub fn read_records<R: Read>(reader: R) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut rows = 0usize;
    for row in reader.deserialize::<RawRecipeRow>() {
        let row = row?;
        rows += 1;
        let record = row.into_record();
        if record.name.is_placeholder() {
            warn!("Skipping row {} without a usable recipe name", rows);
            continue;
        }
        records.push(record);
    }

    let set = RecordSet::from_records(records);
    info!("Ingested {} recipes from {} rows", set.len(), rows);
    Ok(set)
}

/// Read and clean a recipe table from disk
pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<RecordSet> {
    let file = File::open(path.as_ref())?;
    read_records(file)
}

fn distinct<'a>(values: impl Iterator<Item = &'a Entity>) -> BTreeSet<String> {
    values
        .filter(|v| !v.is_placeholder())
        .map(|v| v.as_str().to_string())
        .collect()
}

/// Enumeration lists: ingredients sorted, regions and countries sorted
/// after a leading `""` that stands for "unspecified"
pub fn unique_values(records: &RecordSet) -> UniqueValues {
    let ingredients = distinct(records.iter().flat_map(|r| r.attributes.ingredients.iter()));
    let regions = distinct(records.iter().flat_map(|r| r.attributes.regions.iter()));
    let countries = distinct(records.iter().flat_map(|r| r.attributes.countries.iter()));

    UniqueValues {
        ingredients: ingredients.into_iter().collect(),
        regions: std::iter::once(String::new()).chain(regions).collect(),
        countries: std::iter::once(String::new()).chain(countries).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Name,Best_foodentityname,ScrapedIngredients,Healthy_Type,meal_type,Diet_Types,RegionPart,CountryPart,cook_time,Calories,ProteinContent,Images
Masala Dosa,\"rice, urad dal , potato\",\"2 cups rice, 1 cup dal\",\"low_fat,high_fiber\",breakfast,Vegetarian,South Asia,India,<30 mins,250,6.5,\"['a.jpg']\"
masala-dosa,rice,rice,,lunch,,,,,,,
Greek Salad,\"tomato,feta,,cucumber\",tomato,,lunch,Unknown,Southern Europe,\"Greece, Cyprus\",15 mins,abc,,
,salt,,,,,,,,,,
";

    #[test]
    fn test_read_records_cleans_rows() {
        let records = read_records(TABLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let dosa = records.get(&Entity::new("Masala Dosa")).unwrap();
        assert_eq!(
            dosa.attributes.ingredients,
            vec![Entity::new("rice"), Entity::new("urad_dal"), Entity::new("potato")]
        );
        assert_eq!(dosa.attributes.meal_type, vec![Entity::new("breakfast")]);
        assert_eq!(dosa.attributes.cook_time.as_str(), "less_than_30_mins");
        assert_eq!(dosa.nutrition.calories, Some(250.0));
        assert_eq!(dosa.nutrition.protein, Some(6.5));
        assert_eq!(dosa.nutrition.fat, None);
        assert_eq!(dosa.display_ingredients, "2 cups rice, 1 cup dal");
        assert_eq!(dosa.images.as_deref(), Some("['a.jpg']"));
        assert!(dosa.description.is_none());

        let salad = records.get(&Entity::new("greek salad")).unwrap();
        assert_eq!(salad.attributes.ingredients.len(), 3);
        assert_eq!(salad.attributes.diet_types, vec![Entity::new("unknown")]);
        assert_eq!(salad.nutrition.calories, None);
    }

    #[test]
    fn test_unique_values() {
        let records = read_records(TABLE.as_bytes()).unwrap();
        let uniques = unique_values(&records);

        assert_eq!(
            uniques.ingredients,
            vec!["cucumber", "feta", "potato", "rice", "tomato", "urad_dal"]
        );
        assert_eq!(uniques.regions, vec!["", "south_asia", "southern_europe"]);
        assert_eq!(uniques.countries, vec!["", "cyprus", "greece", "india"]);
    }

    #[test]
    fn test_split_list_drops_blanks() {
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,").is_empty());
        assert_eq!(split_list("High Protein, low-carb"), vec![
            Entity::new("high_protein"),
            Entity::new("low_carb")
        ]);
    }
}
