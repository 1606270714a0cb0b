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

//! Recipe Knowledge Graph
//!
//! Directed, labeled graph of recipes and their attribute values. Uses
//! adjacency lists keyed by node id and supports:
//! - Node lookup by entity
//! - Outgoing (recipe → attribute) and incoming (attribute → recipes) edges
//! - Statistics by node kind and relation
//!
//! The graph is immutable once built; see [`crate::builder`].

use crate::entities::{Entity, EntityKind, Relation, Triple};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node in the graph
pub type NodeId = usize;

/// A graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub entity: Entity,
    pub kind: EntityKind,
}

/// Edge in the recipe graph (recipe → attribute value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub relation: Relation,
    /// Number of times this fact appeared in the source records
    pub occurrence_count: u32,
}

/// Recipe knowledge graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphPersistence", into = "GraphPersistence")]
pub struct RecipeGraph {
    nodes: Vec<GraphNode>,
    name_index: HashMap<Entity, NodeId>,
    outgoing: HashMap<NodeId, Vec<GraphEdge>>,
    incoming: HashMap<NodeId, Vec<GraphEdge>>,
}

impl RecipeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a node.
    ///
    /// A node keeps the kind it was created with, except that a recipe
    /// always stays a recipe and an attribute node later named as a recipe
    /// is promoted.
    pub(crate) fn add_node(&mut self, entity: &Entity, kind: EntityKind) -> NodeId {
        if let Some(&id) = self.name_index.get(entity) {
            if kind == EntityKind::Recipe {
                self.nodes[id].kind = EntityKind::Recipe;
            }
            return id;
        }

        let id = self.nodes.len();
        self.nodes.push(GraphNode {
            entity: entity.clone(),
            kind,
        });
        self.name_index.insert(entity.clone(), id);
        id
    }

    /// Add a directed edge, merging repeats of the same fact
    pub(crate) fn add_edge(&mut self, from: NodeId, relation: Relation, to: NodeId) {
        if let Some(edges) = self.outgoing.get_mut(&from) {
            if let Some(edge) = edges
                .iter_mut()
                .find(|e| e.to == to && e.relation == relation)
            {
                edge.occurrence_count += 1;
                if let Some(back) = self
                    .incoming
                    .get_mut(&to)
                    .and_then(|edges| edges.iter_mut().find(|e| e.from == from && e.relation == relation))
                {
                    back.occurrence_count += 1;
                }
                return;
            }
        }

        let edge = GraphEdge {
            from,
            to,
            relation,
            occurrence_count: 1,
        };
        self.outgoing.entry(from).or_default().push(edge.clone());
        self.incoming.entry(to).or_default().push(edge);
    }

    /// Get node by entity
    pub fn node(&self, entity: &Entity) -> Option<&GraphNode> {
        self.name_index.get(entity).map(|&id| &self.nodes[id])
    }

    pub fn contains(&self, entity: &Entity) -> bool {
        self.name_index.contains_key(entity)
    }

    /// Attribute facts of a recipe, in insertion order
    pub fn outgoing(&self, head: &Entity) -> Vec<(Relation, &Entity)> {
        let Some(&id) = self.name_index.get(head) else {
            return Vec::new();
        };
        self.outgoing
            .get(&id)
            .map(|edges| {
                edges
                    .iter()
                    .map(|e| (e.relation, &self.nodes[e.to].entity))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Heads linked to `tail` through `relation`, with edge multiplicity
    pub fn heads_for(&self, relation: Relation, tail: &Entity) -> Vec<(&Entity, u32)> {
        let Some(&id) = self.name_index.get(tail) else {
            return Vec::new();
        };
        self.incoming
            .get(&id)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|e| e.relation == relation)
                    .map(|e| (&self.nodes[e.from].entity, e.occurrence_count))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Multiplicity of `(head, relation, tail)`, zero when absent
    pub fn edge_count(&self, head: &Entity, relation: Relation, tail: &Entity) -> u32 {
        match (self.name_index.get(head), self.name_index.get(tail)) {
            (Some(from), Some(to)) => self
                .outgoing
                .get(from)
                .and_then(|edges| edges.iter().find(|e| e.to == *to && e.relation == relation))
                .map(|e| e.occurrence_count)
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Recipe nodes in insertion order
    pub fn recipes(&self) -> impl Iterator<Item = &Entity> {
        self.nodes
            .iter()
            .filter(|n| n.kind == EntityKind::Recipe)
            .map(|n| &n.entity)
    }

    /// Distinct facts as triples, recipe-major in insertion order
    pub fn triples(&self) -> Vec<Triple> {
        let mut out = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(edges) = self.outgoing.get(&id) {
                for edge in edges {
                    out.push(Triple::new(
                        node.entity.clone(),
                        edge.relation,
                        self.nodes[edge.to].entity.clone(),
                    ));
                }
            }
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges
    pub fn relationship_count(&self) -> usize {
        self.outgoing.values().map(|e| e.len()).sum()
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        let node_count = self.node_count();
        let relationship_count = self.relationship_count();

        let mut kind_distribution: HashMap<String, usize> = HashMap::new();
        for node in &self.nodes {
            *kind_distribution.entry(kind_label(&node.kind)).or_default() += 1;
        }

        let mut relation_distribution: HashMap<String, usize> = HashMap::new();
        for edges in self.outgoing.values() {
            for edge in edges {
                *relation_distribution
                    .entry(edge.relation.as_str().to_string())
                    .or_default() += 1;
            }
        }

        let recipe_count = kind_distribution.get("recipe").copied().unwrap_or(0);
        let avg_attributes_per_recipe = if recipe_count > 0 {
            relationship_count as f64 / recipe_count as f64
        } else {
            0.0
        };

        GraphStats {
            node_count,
            relationship_count,
            recipe_count,
            avg_attributes_per_recipe,
            kind_distribution,
            relation_distribution,
        }
    }
}

fn kind_label(kind: &EntityKind) -> String {
    match kind {
        EntityKind::Recipe => "recipe".into(),
        EntityKind::Ingredient => "ingredient".into(),
        EntityKind::Region => "region".into(),
        EntityKind::Country => "country".into(),
        EntityKind::DietType => "diet_type".into(),
        EntityKind::MealType => "meal_type".into(),
        EntityKind::CookTime => "cook_time".into(),
        EntityKind::HealthAttribute(_) => "health_attribute".into(),
        EntityKind::Attribute(category) => format!("attribute:{}", category),
    }
}

/// Statistics about the recipe graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub relationship_count: usize,
    pub recipe_count: usize,
    pub avg_attributes_per_recipe: f64,
    pub kind_distribution: HashMap<String, usize>,
    pub relation_distribution: HashMap<String, usize>,
}

/// Persistence format; indices are rebuilt on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphPersistence {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl From<RecipeGraph> for GraphPersistence {
    fn from(graph: RecipeGraph) -> Self {
        let mut edges = Vec::with_capacity(graph.relationship_count());
        for id in 0..graph.nodes.len() {
            if let Some(out) = graph.outgoing.get(&id) {
                edges.extend(out.iter().cloned());
            }
        }
        GraphPersistence {
            nodes: graph.nodes,
            edges,
        }
    }
}

impl From<GraphPersistence> for RecipeGraph {
    fn from(data: GraphPersistence) -> Self {
        let mut graph = RecipeGraph::new();
        for (id, node) in data.nodes.into_iter().enumerate() {
            graph.name_index.insert(node.entity.clone(), id);
            graph.nodes.push(node);
        }
        for edge in data.edges {
            graph
                .outgoing
                .entry(edge.from)
                .or_default()
                .push(edge.clone());
            graph.incoming.entry(edge.to).or_default().push(edge);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecipeGraph {
        let mut graph = RecipeGraph::new();
        let soup = graph.add_node(&Entity::new("soup"), EntityKind::Recipe);
        let salt = graph.add_node(&Entity::new("salt"), EntityKind::Ingredient);
        let lunch = graph.add_node(&Entity::new("lunch"), EntityKind::MealType);
        graph.add_edge(soup, Relation::Contains, salt);
        graph.add_edge(soup, Relation::Contains, salt);
        graph.add_edge(soup, Relation::IsForMealType, lunch);
        graph
    }

    #[test]
    fn test_repeated_fact_merges() {
        let graph = sample();
        assert_eq!(graph.relationship_count(), 2);
        assert_eq!(
            graph.edge_count(&Entity::new("soup"), Relation::Contains, &Entity::new("salt")),
            2
        );
        let heads = graph.heads_for(Relation::Contains, &Entity::new("salt"));
        assert_eq!(heads, vec![(&Entity::new("soup"), 2)]);
    }

    #[test]
    fn test_recipe_kind_wins() {
        let mut graph = sample();
        graph.add_node(&Entity::new("salt"), EntityKind::Recipe);
        graph.add_node(&Entity::new("soup"), EntityKind::Ingredient);
        assert_eq!(graph.node(&Entity::new("salt")).unwrap().kind, EntityKind::Recipe);
        assert_eq!(graph.node(&Entity::new("soup")).unwrap().kind, EntityKind::Recipe);
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.recipe_count, 1);
        assert_eq!(stats.relation_distribution.get("contains"), Some(&1));
        assert!((stats.avg_attributes_per_recipe - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_persistence_round_trip() {
        let graph = sample();
        let json = serde_json::to_string(&graph).unwrap();
        let back: RecipeGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(back.nodes(), graph.nodes());
        assert_eq!(back.triples(), graph.triples());
        assert_eq!(
            back.outgoing(&Entity::new("soup")),
            vec![
                (Relation::Contains, &Entity::new("salt")),
                (Relation::IsForMealType, &Entity::new("lunch")),
            ]
        );
    }
}
