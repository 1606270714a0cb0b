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

//! Recipe Info Formatter

use crate::entities::Entity;
use crate::normalize::display_label;
use crate::record::{Nutrition, RecordSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Shown for absent text and nutrition values
pub const NOT_AVAILABLE: &str = "N/A";

/// Display record of one recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeInfo {
    pub name: String,
    pub description: String,
    pub meal_type: Vec<String>,
    pub diet_type: Vec<String>,
    pub health_type: Vec<String>,
    pub region: Vec<String>,
    pub country: Vec<String>,
    pub cook_time: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub nutrition_facts: BTreeMap<String, String>,
    pub images: Vec<String>,
}

/// Look up a recipe by entity and reshape it for display
pub fn format(entity: &Entity, records: &RecordSet) -> Option<RecipeInfo> {
    let record = records.get(entity)?;
    let attrs = &record.attributes;

    Some(RecipeInfo {
        name: display_label(record.name.as_str()),
        description: record
            .description
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        meal_type: labels(&attrs.meal_type),
        diet_type: labels(&attrs.diet_types),
        health_type: labels(&attrs.healthy_types),
        region: labels(&attrs.regions),
        country: labels(&attrs.countries),
        cook_time: display_label(attrs.cook_time.as_str()),
        ingredients: record
            .display_ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        instructions: record.instructions.clone(),
        nutrition_facts: nutrition_facts(&record.nutrition),
        images: record.images.as_deref().map(parse_images).unwrap_or_default(),
    })
}

fn labels(values: &[Entity]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.as_str().is_empty())
        .map(|v| display_label(v.as_str()))
        .collect()
}

fn fact(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", v, unit),
        None => format!("{} {}", NOT_AVAILABLE, unit),
    }
}

/// Nutrition values with units, keyed by source column name
pub fn nutrition_facts(n: &Nutrition) -> BTreeMap<String, String> {
    [
        ("Calories", fact(n.calories, "kcal")),
        ("FatContent", fact(n.fat, "g")),
        ("CarbohydrateContent", fact(n.carbohydrate, "g")),
        ("ProteinContent", fact(n.protein, "g")),
        ("FiberContent", fact(n.fiber, "g")),
        ("SugarContent", fact(n.sugar, "g")),
        ("SodiumContent", fact(n.sodium, "mg")),
        ("CholesterolContent", fact(n.cholesterol, "mg")),
        ("SaturatedFatContent", fact(n.saturated_fat, "g")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Best-effort parse of a nested image-URL list.
///
/// Accepts JSON or single-quoted list literals, flattens one level of
/// nesting and drops empty entries. Anything unparsable yields no images.
pub fn parse_images(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "[]" {
        return Vec::new();
    }

    let parsed = serde_json::from_str::<Value>(raw)
        .or_else(|_| serde_json::from_str::<Value>(&raw.replace('\'', "\"")));
    let items = match parsed {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            debug!("Image field is not a list: {}", raw);
            return Vec::new();
        }
        Err(e) => {
            debug!("Unparsable image field ({}): {}", e, raw);
            return Vec::new();
        }
    };

    let mut urls = Vec::new();
    for item in items {
        match item {
            Value::String(url) => urls.push(url),
            Value::Array(inner) => {
                urls.extend(inner.into_iter().filter_map(|v| match v {
                    Value::String(url) => Some(url),
                    _ => None,
                }));
            }
            _ => {}
        }
    }
    urls.retain(|u| !u.is_empty());
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecipeRecord;

    fn sample() -> RecordSet {
        let mut r = RecipeRecord::new("Chicken Tikka Masala");
        r.attributes.meal_type = vec![Entity::new("main_course")];
        r.attributes.regions = vec![Entity::new("South Asia")];
        r.attributes.cook_time = Entity::new("1 hour");
        r.display_ingredients = "chicken, yogurt,, garam masala".into();
        r.instructions = "Marinate. Grill. Simmer.".into();
        r.nutrition.calories = Some(420.5);
        r.nutrition.sodium = Some(800.0);
        r.images = Some("[['https://img/1.jpg', ''], 'https://img/2.jpg']".into());
        RecordSet::from_records(vec![r])
    }

    #[test]
    fn test_format_reshapes_record() {
        let info = format(&Entity::new("chicken tikka masala"), &sample()).unwrap();

        assert_eq!(info.name, "Chicken Tikka Masala");
        assert_eq!(info.description, "N/A");
        assert_eq!(info.meal_type, vec!["Main Course"]);
        assert_eq!(info.region, vec!["South Asia"]);
        assert_eq!(info.cook_time, "1 Hour");
        assert_eq!(info.ingredients, vec!["chicken", "yogurt", "garam masala"]);
        assert_eq!(info.nutrition_facts["Calories"], "420.5 kcal");
        assert_eq!(info.nutrition_facts["SodiumContent"], "800 mg");
        assert_eq!(info.nutrition_facts["FiberContent"], "N/A g");
        assert_eq!(info.images, vec!["https://img/1.jpg", "https://img/2.jpg"]);
    }

    #[test]
    fn test_unknown_recipe_is_none() {
        assert!(format(&Entity::new("dragon soup"), &sample()).is_none());
    }

    #[test]
    fn test_malformed_images_fall_back_to_empty() {
        assert!(parse_images("[['unterminated").is_empty());
        assert!(parse_images("not a list").is_empty());
        assert!(parse_images("[]").is_empty());
        assert_eq!(parse_images(r#"["a.png"]"#), vec!["a.png"]);
    }
}
