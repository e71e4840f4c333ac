use std::collections::HashMap;
use std::f64::consts::PI;

use common::storage::types::concept_relation::ConceptRelation;
use serde::Serialize;

pub const CANVAS_SIZE: f64 = 600.0;
const LAYOUT_MARGIN: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub explanation: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Undirected graph of a concept map, laid out on a circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub size: f64,
}

impl ConceptGraph {
    /// Nodes keep first-seen order. Each unordered pair gets one edge, carrying
    /// the explanation of the last relation between the two concepts.
    pub fn from_relations(relations: &[ConceptRelation]) -> Self {
        let mut labels: Vec<&str> = Vec::new();
        let mut node_index: HashMap<&str, usize> = HashMap::new();
        for relation in relations {
            for concept in [relation.source.as_str(), relation.target.as_str()] {
                if !node_index.contains_key(concept) {
                    node_index.insert(concept, labels.len());
                    labels.push(concept);
                }
            }
        }

        let positions = circular_layout(labels.len());
        let nodes: Vec<GraphNode> = labels
            .iter()
            .zip(positions)
            .map(|(label, (x, y))| GraphNode {
                label: (*label).to_string(),
                x,
                y,
            })
            .collect();

        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut edge_index: HashMap<(usize, usize), usize> = HashMap::new();
        for relation in relations {
            let (Some(&from), Some(&to)) = (
                node_index.get(relation.source.as_str()),
                node_index.get(relation.target.as_str()),
            ) else {
                continue;
            };
            let key = (from.min(to), from.max(to));

            if let Some(existing) = edge_index.get(&key).and_then(|&i| edges.get_mut(i)) {
                existing.explanation.clone_from(&relation.explanation);
                continue;
            }

            let (Some(start), Some(end)) = (nodes.get(from), nodes.get(to)) else {
                continue;
            };
            edge_index.insert(key, edges.len());
            edges.push(GraphEdge {
                source: relation.source.clone(),
                target: relation.target.clone(),
                explanation: relation.explanation.clone(),
                x1: start.x,
                y1: start.y,
                x2: end.x,
                y2: end.y,
            });
        }

        Self {
            nodes,
            edges,
            size: CANVAS_SIZE,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.label.as_str()).collect()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.nodes.iter().any(|node| node.label == label)
    }
}

/// Every relation touching `node`, in map order.
pub fn node_information<'a>(
    relations: &'a [ConceptRelation],
    node: &str,
) -> Vec<&'a ConceptRelation> {
    relations
        .iter()
        .filter(|relation| relation.touches(node))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn circular_layout(count: usize) -> Vec<(f64, f64)> {
    let center = CANVAS_SIZE / 2.0;
    if count == 1 {
        return vec![(center, center)];
    }

    let radius = center - LAYOUT_MARGIN;
    (0..count)
        .map(|i| {
            let angle = 2.0 * PI * (i as f64) / (count as f64) - PI / 2.0;
            (
                round2(center + radius * angle.cos()),
                round2(center + radius * angle.sin()),
            )
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
