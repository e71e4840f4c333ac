use common::storage::types::concept_relation::ConceptRelation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub answer: String,
}

impl QuizQuestion {
    pub fn for_relation(relation: &ConceptRelation) -> Self {
        Self {
            question: format!(
                "What is the relationship between {} and {}?",
                relation.source, relation.target
            ),
            answer: relation.explanation.clone(),
        }
    }

    /// Exact match, ignoring case and surrounding whitespace.
    pub fn is_correct(&self, response: &str) -> bool {
        response.trim().to_lowercase() == self.answer.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

/// One question per relation, in map order.
pub fn generate_quiz(relations: &[ConceptRelation]) -> Vec<QuizQuestion> {
    relations.iter().map(QuizQuestion::for_relation).collect()
}

/// Scores `responses` positionally against `questions`. Missing responses count as wrong.
pub fn score_quiz(questions: &[QuizQuestion], responses: &[String]) -> QuizScore {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            responses
                .get(*index)
                .is_some_and(|response| question.is_correct(response))
        })
        .count();

    QuizScore {
        correct,
        total: questions.len(),
    }
}
