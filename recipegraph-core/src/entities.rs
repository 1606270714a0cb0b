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

//! Entity and Relation Types
//!
//! Defines the typed vocabulary of the recipe knowledge graph: entities,
//! their kinds, the fixed relation set and the attribute categories that
//! select a relation.

use crate::normalize::{is_placeholder, normalize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized identifier for a recipe or attribute value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(String);

impl Entity {
    /// Normalize a raw label into an entity
    pub fn new(raw: &str) -> Self {
        Entity(normalize(raw))
    }

    /// Wrap an identifier that is already in canonical form.
    ///
    /// Used for fixed-format identifiers such as nutrient levels
    /// (`high_protein`) that must match the graph byte for byte.
    pub fn verbatim(identifier: impl Into<String>) -> Self {
        Entity(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True for the "value unknown" placeholder and the empty identifier
    pub fn is_placeholder(&self) -> bool {
        is_placeholder(&self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Entity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sub-kind of a health attribute node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HealthKind {
    Protein,
    Carb,
    Fat,
    SaturatedFat,
    Calorie,
    Sodium,
    Sugar,
    Fiber,
    Cholesterol,
    /// Health attribute without a recognized nutrient
    Generic,
}

impl HealthKind {
    /// The `Has<X>Level` relation for this nutrient
    pub fn relation(self) -> Relation {
        match self {
            HealthKind::Protein => Relation::HasProteinLevel,
            HealthKind::Carb => Relation::HasCarbLevel,
            HealthKind::Fat => Relation::HasFatLevel,
            HealthKind::SaturatedFat => Relation::HasSaturatedFatLevel,
            HealthKind::Calorie => Relation::HasCalorieLevel,
            HealthKind::Sodium => Relation::HasSodiumLevel,
            HealthKind::Sugar => Relation::HasSugarLevel,
            HealthKind::Fiber => Relation::HasFiberLevel,
            HealthKind::Cholesterol => Relation::HasCholesterolLevel,
            HealthKind::Generic => Relation::HasHealthAttribute,
        }
    }

    /// Classify a normalized health token with [`HEALTH_RULES`]
    pub fn classify(token: &str) -> Self {
        HEALTH_RULES
            .iter()
            .find(|rule| rule.matches(token))
            .map(|rule| rule.kind)
            .unwrap_or(HealthKind::Generic)
    }
}

/// One substring rule of the health-attribute dispatch
#[derive(Debug, Clone, Copy)]
pub struct HealthRule {
    /// Substring that must occur in the token
    pub contains: &'static str,
    /// Substring that must not occur in the token
    pub excludes: Option<&'static str>,
    pub kind: HealthKind,
}

impl HealthRule {
    pub fn matches(&self, token: &str) -> bool {
        token.contains(self.contains) && self.excludes.map_or(true, |ex| !token.contains(ex))
    }
}

/// Health-attribute dispatch, evaluated top to bottom; first match wins.
///
/// `saturated_fat` sits above `fat` so a saturated-fat token can never be
/// classified as a plain fat level. A token mentioning `saturated` without
/// `saturated_fat` skips both fat rules.
pub const HEALTH_RULES: &[HealthRule] = &[
    HealthRule { contains: "protein", excludes: None, kind: HealthKind::Protein },
    HealthRule { contains: "carb", excludes: None, kind: HealthKind::Carb },
    HealthRule { contains: "saturated_fat", excludes: None, kind: HealthKind::SaturatedFat },
    HealthRule { contains: "fat", excludes: Some("saturated"), kind: HealthKind::Fat },
    HealthRule { contains: "calorie", excludes: None, kind: HealthKind::Calorie },
    HealthRule { contains: "sodium", excludes: None, kind: HealthKind::Sodium },
    HealthRule { contains: "sugar", excludes: None, kind: HealthKind::Sugar },
    HealthRule { contains: "fiber", excludes: None, kind: HealthKind::Fiber },
    HealthRule { contains: "cholesterol", excludes: None, kind: HealthKind::Cholesterol },
];

/// Entity types in the recipe graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Recipe,
    Ingredient,
    Region,
    Country,
    DietType,
    MealType,
    CookTime,
    HealthAttribute(HealthKind),
    /// Value of an unrecognized attribute category
    Attribute(String),
}

/// Relationship types between a recipe and one of its attribute values
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "hasDietType")]
    HasDietType,
    #[serde(rename = "isForMealType")]
    IsForMealType,
    #[serde(rename = "needTimeToCook")]
    NeedTimeToCook,
    #[serde(rename = "isFromRegion")]
    IsFromRegion,
    #[serde(rename = "isFromCountry")]
    IsFromCountry,
    HasProteinLevel,
    HasCarbLevel,
    HasFatLevel,
    HasSaturatedFatLevel,
    HasCalorieLevel,
    HasSodiumLevel,
    HasSugarLevel,
    HasFiberLevel,
    HasCholesterolLevel,
    HasHealthAttribute,
    #[serde(rename = "hasAttribute")]
    HasAttribute,
}

impl Relation {
    pub const ALL: [Relation; 17] = [
        Relation::Contains,
        Relation::HasDietType,
        Relation::IsForMealType,
        Relation::NeedTimeToCook,
        Relation::IsFromRegion,
        Relation::IsFromCountry,
        Relation::HasProteinLevel,
        Relation::HasCarbLevel,
        Relation::HasFatLevel,
        Relation::HasSaturatedFatLevel,
        Relation::HasCalorieLevel,
        Relation::HasSodiumLevel,
        Relation::HasSugarLevel,
        Relation::HasFiberLevel,
        Relation::HasCholesterolLevel,
        Relation::HasHealthAttribute,
        Relation::HasAttribute,
    ];

    /// Wire label, as written to the triple table
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Contains => "contains",
            Relation::HasDietType => "hasDietType",
            Relation::IsForMealType => "isForMealType",
            Relation::NeedTimeToCook => "needTimeToCook",
            Relation::IsFromRegion => "isFromRegion",
            Relation::IsFromCountry => "isFromCountry",
            Relation::HasProteinLevel => "HasProteinLevel",
            Relation::HasCarbLevel => "HasCarbLevel",
            Relation::HasFatLevel => "HasFatLevel",
            Relation::HasSaturatedFatLevel => "HasSaturatedFatLevel",
            Relation::HasCalorieLevel => "HasCalorieLevel",
            Relation::HasSodiumLevel => "HasSodiumLevel",
            Relation::HasSugarLevel => "HasSugarLevel",
            Relation::HasFiberLevel => "HasFiberLevel",
            Relation::HasCholesterolLevel => "HasCholesterolLevel",
            Relation::HasHealthAttribute => "HasHealthAttribute",
            Relation::HasAttribute => "hasAttribute",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a relation label outside the fixed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown relation label: {0}")]
pub struct UnknownRelation(pub String);

impl FromStr for Relation {
    type Err = UnknownRelation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRelation(s.to_string()))
    }
}

/// Attribute categories of a recipe record, each selecting a relation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCategory {
    Ingredients,
    DietTypes,
    MealType,
    CookTime,
    Regions,
    Countries,
    HealthyTypes,
    /// Any other column; maps to `hasAttribute`
    Other(String),
}

impl AttributeCategory {
    /// Categories in triple emission order
    pub const KNOWN: [AttributeCategory; 7] = [
        AttributeCategory::Ingredients,
        AttributeCategory::DietTypes,
        AttributeCategory::MealType,
        AttributeCategory::CookTime,
        AttributeCategory::Regions,
        AttributeCategory::Countries,
        AttributeCategory::HealthyTypes,
    ];

    /// Relation for a value of this category.
    ///
    /// Health types dispatch on the value itself; every other category has a
    /// fixed relation.
    pub fn relation_for(&self, value: &Entity) -> Relation {
        match self {
            AttributeCategory::Ingredients => Relation::Contains,
            AttributeCategory::DietTypes => Relation::HasDietType,
            AttributeCategory::MealType => Relation::IsForMealType,
            AttributeCategory::CookTime => Relation::NeedTimeToCook,
            AttributeCategory::Regions => Relation::IsFromRegion,
            AttributeCategory::Countries => Relation::IsFromCountry,
            AttributeCategory::HealthyTypes => HealthKind::classify(value.as_str()).relation(),
            AttributeCategory::Other(_) => Relation::HasAttribute,
        }
    }

    /// Node kind for a value of this category
    pub fn kind_for(&self, value: &Entity) -> EntityKind {
        match self {
            AttributeCategory::Ingredients => EntityKind::Ingredient,
            AttributeCategory::DietTypes => EntityKind::DietType,
            AttributeCategory::MealType => EntityKind::MealType,
            AttributeCategory::CookTime => EntityKind::CookTime,
            AttributeCategory::Regions => EntityKind::Region,
            AttributeCategory::Countries => EntityKind::Country,
            AttributeCategory::HealthyTypes => {
                EntityKind::HealthAttribute(HealthKind::classify(value.as_str()))
            }
            AttributeCategory::Other(name) => EntityKind::Attribute(name.clone()),
        }
    }
}

/// A (head, relation, tail) fact of the recipe graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Recipe entity
    pub head: Entity,
    pub relation: Relation,
    /// Attribute value entity
    pub tail: Entity,
}

impl Triple {
    pub fn new(head: Entity, relation: Relation, tail: Entity) -> Self {
        Self { head, relation, tail }
    }
}
