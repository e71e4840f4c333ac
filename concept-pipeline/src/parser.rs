use common::storage::types::concept_relation::ConceptRelation;

const LINE_MARKER: &str = "->";
const EXPLANATION_SEPARATOR: &str = ": ";
const CONCEPT_SEPARATOR: &str = " -> ";

/// Scrapes `Concept -> Related Concept: Explanation` lines out of a free-text
/// model reply.
///
/// Lines that do not match that exact shape are skipped. In particular an
/// explanation that itself contains `": "` drops the whole line, as do
/// numbering prefixes such as `1. A->B: ...` that break the `" -> "` split.
pub fn parse_concept_map(reply: &str) -> Vec<ConceptRelation> {
    reply.split('\n').filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<ConceptRelation> {
    if !line.contains(LINE_MARKER) {
        return None;
    }

    let (relationship, explanation) = split_exactly_two(line, EXPLANATION_SEPARATOR)?;
    let (source, target) = split_exactly_two(relationship, CONCEPT_SEPARATOR)?;

    Some(ConceptRelation::new(
        source.trim(),
        target.trim(),
        explanation.trim(),
    ))
}

fn split_exactly_two<'a>(value: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let mut parts = value.split(separator);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Some((first, second)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_lines_in_order() {
        let reply = "Photosynthesis -> Chlorophyll: Chlorophyll captures light\n\
                     Chlorophyll -> Light: Absorbs red and blue wavelengths\n\
                     Light -> Energy: Light is converted into chemical energy";

        let relations = parse_concept_map(reply);

        assert_eq!(
            relations,
            vec![
                ConceptRelation::new(
                    "Photosynthesis",
                    "Chlorophyll",
                    "Chlorophyll captures light"
                ),
                ConceptRelation::new("Chlorophyll", "Light", "Absorbs red and blue wavelengths"),
                ConceptRelation::new("Light", "Energy", "Light is converted into chemical energy"),
            ]
        );
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let reply = "Here is your concept map:\n\
                     A -> B: first\n\
                     \n\
                     no arrow here: at all\n\
                     C -> D: has: two separators\n\
                     E -> F without explanation\n\
                     G->H: missing spaces around the arrow\n\
                     I -> J -> K: too many arrows\n\
                     L -> M: last";

        let relations = parse_concept_map(reply);

        assert_eq!(
            relations,
            vec![
                ConceptRelation::new("A", "B", "first"),
                ConceptRelation::new("L", "M", "last"),
            ]
        );
    }

    #[test]
    fn test_fields_are_trimmed_and_crlf_tolerated() {
        let relations = parse_concept_map("  Cell  ->  Membrane : Encloses the cell  \r\n");

        assert_eq!(
            relations,
            vec![ConceptRelation::new("Cell", "Membrane", "Encloses the cell")]
        );
    }

    #[test]
    fn test_duplicates_and_self_relations_are_kept() {
        let reply = "A -> A: itself\nA -> B: once\nA -> B: once";

        let relations = parse_concept_map(reply);

        assert_eq!(relations.len(), 3);
        assert_eq!(relations[0].source, relations[0].target);
        assert_eq!(relations[1], relations[2]);
    }

    #[test]
    fn test_numbered_prefix_is_kept_as_part_of_the_name() {
        let relations = parse_concept_map("1. Atom -> Electron: Electrons orbit the nucleus");

        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].source, "1. Atom");
    }

    #[test]
    fn test_empty_reply() {
        assert!(parse_concept_map("").is_empty());
    }
}
