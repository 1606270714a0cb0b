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

//! Knowledge Graph Builder
//!
//! Turns recipe records into the typed graph and the flat triple list used
//! to fit the link-prediction model.
//!
//! ```text
//! RecipeRecord ──► recipe node ──► per category ──► per value
//!                                      │                │
//!                              relation dispatch   skip placeholder/empty
//!                                      ▼                ▼
//!                                 graph edge   +   triple (encounter order)
//! ```

use crate::entities::{AttributeCategory, Entity, EntityKind, Triple};
use crate::graph::{NodeId, RecipeGraph};
use crate::record::{AttributeValues, RecipeRecord};
use tracing::{debug, info, warn};

/// Incremental graph builder
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: RecipeGraph,
    triples: Vec<Triple>,
    skipped: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record: its recipe node plus one edge and triple per value.
    ///
    /// A record whose name normalizes to a placeholder is dropped whole.
    pub fn add_record(&mut self, record: &RecipeRecord) {
        if record.name.is_placeholder() {
            warn!("Skipping recipe with placeholder name '{}'", record.name);
            return;
        }

        let recipe = self.graph.add_node(&record.name, EntityKind::Recipe);

        for (category, values) in record.attributes.categories() {
            match values {
                AttributeValues::List(values) => {
                    for value in values {
                        self.add_fact(recipe, &record.name, &category, value);
                    }
                }
                AttributeValues::Scalar(value) => {
                    self.add_fact(recipe, &record.name, &category, value);
                }
            }
        }
    }

    fn add_fact(
        &mut self,
        recipe: NodeId,
        recipe_name: &Entity,
        category: &AttributeCategory,
        value: &Entity,
    ) {
        if value.is_placeholder() {
            self.skipped += 1;
            return;
        }

        let relation = category.relation_for(value);
        let node = self.graph.add_node(value, category.kind_for(value));
        self.graph.add_edge(recipe, relation, node);
        self.triples
            .push(Triple::new(recipe_name.clone(), relation, value.clone()));
    }

    /// Finish building; triples keep encounter order
    pub fn finish(self) -> (RecipeGraph, Vec<Triple>) {
        debug!("Skipped {} unknown or empty attribute values", self.skipped);
        info!(
            "Built recipe graph: {} nodes, {} edges, {} triples",
            self.graph.node_count(),
            self.graph.relationship_count(),
            self.triples.len()
        );
        (self.graph, self.triples)
    }
}

/// Build the graph and triple list from a record collection
pub fn build<'a>(records: impl IntoIterator<Item = &'a RecipeRecord>) -> (RecipeGraph, Vec<Triple>) {
    let mut builder = GraphBuilder::new();
    for record in records {
        builder.add_record(record);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{HealthKind, Relation};

    fn record(name: &str) -> RecipeRecord {
        RecipeRecord::new(name)
    }

    fn entities(values: &[&str]) -> Vec<Entity> {
        values.iter().map(|v| Entity::new(v)).collect()
    }

    #[test]
    fn test_build_emits_triples_in_encounter_order() {
        let mut r = record("Omelette");
        r.attributes.ingredients = entities(&["egg", "chive"]);
        r.attributes.diet_types = entities(&["vegetarian"]);
        r.attributes.meal_type = entities(&["breakfast"]);
        r.attributes.cook_time = Entity::new("<15 mins");
        r.attributes.regions = entities(&["Western Europe"]);
        r.attributes.countries = entities(&["France"]);
        r.attributes.healthy_types = entities(&["high_protein", "low_saturated_fat"]);

        let (graph, triples) = build([&r]);

        let relations: Vec<Relation> = triples.iter().map(|t| t.relation).collect();
        assert_eq!(
            relations,
            vec![
                Relation::Contains,
                Relation::Contains,
                Relation::HasDietType,
                Relation::IsForMealType,
                Relation::NeedTimeToCook,
                Relation::IsFromRegion,
                Relation::IsFromCountry,
                Relation::HasProteinLevel,
                Relation::HasSaturatedFatLevel,
            ]
        );
        assert_eq!(triples[4].tail.as_str(), "less_than_15_mins");
        assert_eq!(triples[5].tail.as_str(), "western_europe");
        assert_eq!(
            graph.node(&Entity::new("low_saturated_fat")).unwrap().kind,
            EntityKind::HealthAttribute(HealthKind::SaturatedFat)
        );
        assert_eq!(graph.triples(), triples);
    }

    #[test]
    fn test_placeholders_are_skipped() {
        let mut r = record("Mystery Stew");
        r.attributes.diet_types = entities(&["Unknown"]);
        r.attributes.regions = vec![Entity::verbatim("")];
        r.attributes.cook_time = Entity::new("unknown");
        r.attributes.meal_type = entities(&["dinner"]);

        let (graph, triples) = build([&r]);

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].tail.as_str(), "dinner");
        assert!(!graph.contains(&Entity::new("unknown")));
        assert!(!graph.contains(&Entity::verbatim("")));
    }

    #[test]
    fn test_recipe_without_attributes_is_still_a_node() {
        let r = record("Plain Water");
        let (graph, triples) = build([&r]);

        assert!(triples.is_empty());
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.recipes().count(), 1);
    }

    #[test]
    fn test_placeholder_named_recipe_is_dropped() {
        let mut r = record("  ");
        r.attributes.ingredients = entities(&["salt"]);

        let (graph, triples) = build([&r]);

        assert!(triples.is_empty());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_extra_columns_use_generic_relation() {
        let mut r = record("Focaccia");
        r.attributes
            .extra
            .insert("texture".into(), entities(&["Airy"]));

        let (graph, triples) = build([&r]);

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].relation, Relation::HasAttribute);
        assert_eq!(
            graph.node(&Entity::new("airy")).unwrap().kind,
            EntityKind::Attribute("texture".into())
        );
    }

    #[test]
    fn test_recipes_major_order() {
        let mut a = record("A");
        a.attributes.ingredients = entities(&["x"]);
        let mut b = record("B");
        b.attributes.ingredients = entities(&["y"]);
        a.attributes.meal_type = entities(&["lunch"]);

        let (_, triples) = build([&a, &b]);
        let heads: Vec<&str> = triples.iter().map(|t| t.head.as_str()).collect();
        assert_eq!(heads, vec!["a", "a", "b"]);
    }
}
