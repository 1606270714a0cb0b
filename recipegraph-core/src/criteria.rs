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

//! Criterion Mapper
//!
//! Converts a structured user query plus per-field weights into the list of
//! (target entity, relation, weight) criteria sent to the oracle.

use crate::entities::{Entity, Relation};
use crate::error::{RecipeGraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weight used when the query carries none for a field
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A user's multi-attribute recommendation query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub meal_type: Option<String>,
    pub calories: Option<String>,
    pub carbs: Option<String>,
    pub protein: Option<String>,
    pub fat: Option<String>,
    pub diet_type: Option<String>,
    pub region: Option<String>,
    pub cook_time: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub country: Option<String>,
    /// Weight per field key (`meal_type`, `calories`, `ingredients`, ...)
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

/// One constraint of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub target: Entity,
    pub relation: Relation,
    /// Non-negative, finite
    pub weight: f64,
}

/// Free-text fields, in criterion emission order
const TEXT_FIELDS: [(&str, Relation); 5] = [
    ("meal_type", Relation::IsForMealType),
    ("diet_type", Relation::HasDietType),
    ("region", Relation::IsFromRegion),
    ("cook_time", Relation::NeedTimeToCook),
    ("country", Relation::IsFromCountry),
];

/// Nutrient-level fields: (field key, nutrient token, relation)
const LEVEL_FIELDS: [(&str, &str, Relation); 4] = [
    ("calories", "calorie", Relation::HasCalorieLevel),
    ("carbs", "carb", Relation::HasCarbLevel),
    ("protein", "protein", Relation::HasProteinLevel),
    ("fat", "fat", Relation::HasFatLevel),
];

impl UserQuery {
    fn text_field(&self, key: &str) -> Option<&str> {
        let value = match key {
            "meal_type" => &self.meal_type,
            "diet_type" => &self.diet_type,
            "region" => &self.region,
            "cook_time" => &self.cook_time,
            "country" => &self.country,
            "calories" => &self.calories,
            "carbs" => &self.carbs,
            "protein" => &self.protein,
            "fat" => &self.fat,
            _ => &None,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    fn weight(&self, key: &str) -> Result<f64> {
        let weight = self.weights.get(key).copied().unwrap_or(DEFAULT_WEIGHT);
        if !weight.is_finite() || weight < 0.0 {
            return Err(RecipeGraphError::InvalidWeight {
                field: key.to_string(),
                weight,
            });
        }
        Ok(weight)
    }
}

/// Nutrient level entity in the graph's fixed naming scheme (`high_protein`)
pub fn level_entity(level: &str, nutrient: &str) -> Entity {
    Entity::verbatim(format!("{}_{}", level.to_lowercase(), nutrient))
}

/// Map a query to criteria.
///
/// Emits one criterion per present field and one per ingredient; absent and
/// empty fields emit nothing. An empty result means no recommendation is
/// possible, not an error.
pub fn map_query(query: &UserQuery) -> Result<Vec<Criterion>> {
    let mut criteria = Vec::new();

    for (key, relation) in TEXT_FIELDS {
        if let Some(value) = query.text_field(key) {
            criteria.push(Criterion {
                target: Entity::new(value),
                relation,
                weight: query.weight(key)?,
            });
        }
    }

    for (key, nutrient, relation) in LEVEL_FIELDS {
        if let Some(level) = query.text_field(key) {
            criteria.push(Criterion {
                target: level_entity(level, nutrient),
                relation,
                weight: query.weight(key)?,
            });
        }
    }

    if let Some(ingredients) = query.ingredients.as_ref().filter(|i| !i.is_empty()) {
        let weight = query.weight("ingredients")?;
        for ingredient in ingredients {
            let target = Entity::new(ingredient);
            if target.as_str().is_empty() {
                continue;
            }
            criteria.push(Criterion {
                target,
                relation: Relation::Contains,
                weight,
            });
        }
    }

    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_maps_to_no_criteria() {
        assert!(map_query(&UserQuery::default()).unwrap().is_empty());

        let blank = UserQuery {
            meal_type: Some(String::new()),
            ingredients: Some(vec![]),
            ..Default::default()
        };
        assert!(map_query(&blank).unwrap().is_empty());
    }

    #[test]
    fn test_fields_map_in_order_with_weights() {
        let query = UserQuery {
            meal_type: Some("Breakfast".into()),
            calories: Some("Low".into()),
            region: Some("South Asia".into()),
            weights: HashMap::from([("calories".to_string(), 2.0)]),
            ..Default::default()
        };

        let criteria = map_query(&query).unwrap();

        assert_eq!(
            criteria,
            vec![
                Criterion {
                    target: Entity::new("breakfast"),
                    relation: Relation::IsForMealType,
                    weight: 1.0,
                },
                Criterion {
                    target: Entity::new("south_asia"),
                    relation: Relation::IsFromRegion,
                    weight: 1.0,
                },
                Criterion {
                    target: Entity::verbatim("low_calorie"),
                    relation: Relation::HasCalorieLevel,
                    weight: 2.0,
                },
            ]
        );
    }

    #[test]
    fn test_levels_use_fixed_format() {
        let query = UserQuery {
            protein: Some("HIGH".into()),
            carbs: Some("Very Low".into()),
            fat: Some("low".into()),
            ..Default::default()
        };

        let targets: Vec<String> = map_query(&query)
            .unwrap()
            .into_iter()
            .map(|c| c.target.into_string())
            .collect();

        assert_eq!(targets, vec!["very low_carb", "high_protein", "low_fat"]);
    }

    #[test]
    fn test_ingredients_share_weight() {
        let query = UserQuery {
            ingredients: Some(vec!["Olive Oil".into(), " ".into(), "garlic".into()]),
            weights: HashMap::from([("ingredients".to_string(), 0.5)]),
            ..Default::default()
        };

        let criteria = map_query(&query).unwrap();

        assert_eq!(criteria.len(), 2);
        assert!(criteria.iter().all(|c| c.relation == Relation::Contains && c.weight == 0.5));
        assert_eq!(criteria[0].target.as_str(), "olive_oil");
    }

    #[test]
    fn test_negative_weight_rejected() {
        let query = UserQuery {
            country: Some("Italy".into()),
            weights: HashMap::from([("country".to_string(), -1.0)]),
            ..Default::default()
        };

        let err = map_query(&query).unwrap_err();
        assert!(matches!(err, RecipeGraphError::InvalidWeight { ref field, .. } if field == "country"));
    }
}
