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

//! Recipe records
//!
//! The tabular input of the graph builder and the formatter. Records are
//! produced by ingestion and treated as read-only here.

use crate::entities::{AttributeCategory, Entity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

/// Graph-facing attributes of one recipe (all values normalized)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeAttributes {
    pub ingredients: Vec<Entity>,
    pub diet_types: Vec<Entity>,
    pub meal_type: Vec<Entity>,
    pub cook_time: Entity,
    pub regions: Vec<Entity>,
    pub countries: Vec<Entity>,
    pub healthy_types: Vec<Entity>,
    /// Columns outside the known categories, by column name
    pub extra: BTreeMap<String, Vec<Entity>>,
}

/// Values of one attribute category
#[derive(Debug, Clone, Copy)]
pub enum AttributeValues<'a> {
    List(&'a [Entity]),
    Scalar(&'a Entity),
}

impl RecipeAttributes {
    /// Categories with their values, in triple emission order
    pub fn categories(&self) -> Vec<(AttributeCategory, AttributeValues<'_>)> {
        let mut out = Vec::with_capacity(AttributeCategory::KNOWN.len() + self.extra.len());
        for category in AttributeCategory::KNOWN {
            let values = match category {
                AttributeCategory::Ingredients => AttributeValues::List(&self.ingredients),
                AttributeCategory::DietTypes => AttributeValues::List(&self.diet_types),
                AttributeCategory::MealType => AttributeValues::List(&self.meal_type),
                AttributeCategory::CookTime => AttributeValues::Scalar(&self.cook_time),
                AttributeCategory::Regions => AttributeValues::List(&self.regions),
                AttributeCategory::Countries => AttributeValues::List(&self.countries),
                AttributeCategory::HealthyTypes => AttributeValues::List(&self.healthy_types),
                AttributeCategory::Other(_) => continue,
            };
            out.push((category, values));
        }
        for (name, values) in &self.extra {
            out.push((AttributeCategory::Other(name.clone()), AttributeValues::List(values)));
        }
        out
    }
}

/// Numeric nutrition fields; `None` when the source cell was empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: Option<f64>,
    pub fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub cholesterol: Option<f64>,
    pub sodium: Option<f64>,
    pub carbohydrate: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub protein: Option<f64>,
}

/// One recipe row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    /// Normalized recipe name; unique within a [`RecordSet`]
    pub name: Entity,
    pub attributes: RecipeAttributes,
    /// Free-text ingredient list for display, comma separated
    pub display_ingredients: String,
    pub description: Option<String>,
    pub instructions: String,
    /// Raw nested image-URL list as found in the source table
    pub images: Option<String>,
    pub nutrition: Nutrition,
}

impl RecipeRecord {
    /// Record with the given name and no attributes
    pub fn new(name: &str) -> Self {
        Self {
            name: Entity::new(name),
            attributes: RecipeAttributes::default(),
            display_ingredients: String::new(),
            description: None,
            instructions: String::new(),
            images: None,
            nutrition: Nutrition::default(),
        }
    }
}

/// Recipe records keyed by normalized name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<RecipeRecord>", into = "Vec<RecipeRecord>")]
pub struct RecordSet {
    records: Vec<RecipeRecord>,
    index: HashMap<Entity, usize>,
}

impl RecordSet {
    /// Collect records, dropping later duplicates of a name
    pub fn from_records(records: impl IntoIterator<Item = RecipeRecord>) -> Self {
        let mut set = Self::default();
        for record in records {
            if set.index.contains_key(&record.name) {
                warn!("Dropping duplicate recipe: {}", record.name);
                continue;
            }
            set.index.insert(record.name.clone(), set.records.len());
            set.records.push(record);
        }
        set
    }

    pub fn get(&self, name: &Entity) -> Option<&RecipeRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn contains(&self, name: &Entity) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[RecipeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The set of known recipe entities
    pub fn names(&self) -> HashSet<Entity> {
        self.index.keys().cloned().collect()
    }

    /// Per-recipe attribute dictionary
    pub fn attributes_by_name(&self) -> BTreeMap<Entity, RecipeAttributes> {
        self.records
            .iter()
            .map(|r| (r.name.clone(), r.attributes.clone()))
            .collect()
    }
}

impl From<Vec<RecipeRecord>> for RecordSet {
    fn from(records: Vec<RecipeRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<RecordSet> for Vec<RecipeRecord> {
    fn from(set: RecordSet) -> Self {
        set.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_keep_first() {
        let mut first = RecipeRecord::new("Pancakes");
        first.instructions = "first".into();
        let mut second = RecipeRecord::new("pancakes");
        second.instructions = "second".into();

        let set = RecordSet::from_records(vec![first, second, RecipeRecord::new("Waffles")]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&Entity::new("PANCAKES")).unwrap().instructions, "first");
        assert!(set.contains(&Entity::new("waffles")));
    }

    #[test]
    fn test_default_attributes_are_placeholders() {
        let attrs = RecipeAttributes::default();
        assert!(attrs.cook_time.is_placeholder());
        assert!(attrs.ingredients.is_empty());
    }

    #[test]
    fn test_categories_order() {
        let mut attrs = RecipeAttributes::default();
        attrs.extra.insert("cuisine_style".into(), vec![Entity::new("rustic")]);

        let names: Vec<AttributeCategory> =
            attrs.categories().into_iter().map(|(c, _)| c).collect();

        assert_eq!(&names[..7], &AttributeCategory::KNOWN[..]);
        assert_eq!(names[7], AttributeCategory::Other("cuisine_style".into()));
    }

    #[test]
    fn test_record_set_serde_rebuilds_index() {
        let set = RecordSet::from_records(vec![RecipeRecord::new("Soup"), RecipeRecord::new("Stew")]);
        let json = serde_json::to_string(&set).unwrap();
        let back: RecordSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back.get(&Entity::new("stew")).is_some());
    }
}
