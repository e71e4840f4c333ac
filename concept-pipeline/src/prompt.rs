use common::error::AppError;

pub const MISSING_TOPIC_MESSAGE: &str = "Please provide a topic";

/// Builds the instruction sent to the model for `topic`.
///
/// The topic is inserted verbatim. Only an empty topic is rejected.
pub fn build_concept_map_prompt(topic: &str) -> Result<String, AppError> {
    if topic.is_empty() {
        return Err(AppError::Validation(MISSING_TOPIC_MESSAGE.to_string()));
    }

    Ok(format!(
        "Generate a list of key concepts related to {topic}, along with their relationships and explanations for how they are connected. Format: Concept -> Related Concept: Explanation"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_topic_and_marker() {
        for topic in ["Photosynthesis", "C++ templates", "  spaced  ", "ünïcödé: -> {}"] {
            let prompt = build_concept_map_prompt(topic).expect("prompt");
            assert!(prompt.contains(topic));
            assert!(prompt.contains("->"));
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_concept_map_prompt("Rust").expect("prompt"),
            build_concept_map_prompt("Rust").expect("prompt")
        );
    }

    #[test]
    fn test_empty_topic_is_missing_input() {
        let result = build_concept_map_prompt("");
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == MISSING_TOPIC_MESSAGE));
    }
}
