use std::fmt;

use serde::{Deserialize, Serialize};

/// A directed link between two concepts together with the model's
/// explanation of how they relate.
///
/// Serialized as a `[source, target, explanation]` array, which is the shape
/// the `/generate_map` endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct ConceptRelation {
    pub source: String,
    pub target: String,
    pub explanation: String,
}

impl ConceptRelation {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            explanation: explanation.into(),
        }
    }

    pub fn touches(&self, concept: &str) -> bool {
        self.source == concept || self.target == concept
    }
}

impl From<(String, String, String)> for ConceptRelation {
    fn from((source, target, explanation): (String, String, String)) -> Self {
        Self {
            source,
            target,
            explanation,
        }
    }
}

impl From<ConceptRelation> for (String, String, String) {
    fn from(relation: ConceptRelation) -> Self {
        (relation.source, relation.target, relation.explanation)
    }
}

impl fmt::Display for ConceptRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.source, self.target, self.explanation)
    }
}

/// Plain-text rendering of a whole map, one relation per line.
pub fn format_relations(relations: &[ConceptRelation]) -> String {
    relations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("\n")
}
