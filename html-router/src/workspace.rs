//! Per-session study state: the current map, its quiz and the last chat
//! exchange. Survives page loads but not sign-out.

use common::storage::types::concept_relation::ConceptRelation;
use concept_pipeline::quiz::{generate_quiz, QuizQuestion, QuizScore};
use serde::{Deserialize, Serialize};

use crate::SessionType;

const WORKSPACE_KEY: &str = "workspace";
const NOTICE_KEY: &str = "notice";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub topic: Option<String>,
    pub relations: Vec<ConceptRelation>,
    pub quiz: Vec<QuizQuestion>,
    pub quiz_answers: Vec<String>,
    pub quiz_score: Option<QuizScore>,
    pub chat: Option<ChatExchange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub question: String,
    pub answer: String,
}

impl Workspace {
    /// A fresh workspace for a newly generated map. Quiz progress and the
    /// previous chat exchange are discarded.
    pub fn with_map(topic: String, relations: Vec<ConceptRelation>) -> Self {
        Self {
            topic: Some(topic),
            quiz: generate_quiz(&relations),
            relations,
            ..Self::default()
        }
    }

    pub fn load(session: &SessionType) -> Self {
        session.get(WORKSPACE_KEY).unwrap_or_default()
    }

    pub fn save(&self, session: &SessionType) {
        session.set(WORKSPACE_KEY, self);
    }

    pub fn clear(session: &SessionType) {
        session.remove(WORKSPACE_KEY);
        session.remove(NOTICE_KEY);
    }

    /// The topic of the current map, if one with at least one relation exists.
    pub fn active_topic(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .filter(|_| !self.relations.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn flash(self, session: &SessionType) {
        session.set(NOTICE_KEY, self);
    }

    pub fn take(session: &SessionType) -> Option<Self> {
        let notice = session.get(NOTICE_KEY);
        if notice.is_some() {
            session.remove(NOTICE_KEY);
        }
        notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_resets_quiz_and_chat() {
        let relations = vec![
            ConceptRelation::new("Sun", "Earth", "Earth orbits the sun"),
            ConceptRelation::new("Earth", "Moon", "The moon orbits earth"),
        ];

        let workspace = Workspace::with_map("Astronomy".into(), relations.clone());

        assert_eq!(workspace.topic.as_deref(), Some("Astronomy"));
        assert_eq!(workspace.relations, relations);
        assert_eq!(workspace.quiz.len(), 2);
        assert!(workspace.quiz_answers.is_empty());
        assert!(workspace.quiz_score.is_none());
        assert!(workspace.chat.is_none());
    }

    #[test]
    fn test_active_topic_requires_relations() {
        assert_eq!(Workspace::default().active_topic(), None);
        assert_eq!(
            Workspace::with_map("Empty".into(), Vec::new()).active_topic(),
            None
        );
        assert_eq!(
            Workspace::with_map("Cells".into(), vec![ConceptRelation::new("A", "B", "c")])
                .active_topic(),
            Some("Cells")
        );
    }

    #[test]
    fn test_workspace_survives_serialization() {
        let mut workspace =
            Workspace::with_map("Cells".into(), vec![ConceptRelation::new("A", "B", "c")]);
        workspace.chat = Some(ChatExchange {
            question: "q".into(),
            answer: "a".into(),
        });

        let json = serde_json::to_string(&workspace).expect("serialize");
        let restored: Workspace = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored, workspace);
    }

    #[test]
    fn test_notice_kind_serializes_lowercase() {
        let json = serde_json::to_value(Notice::error("nope")).expect("serialize");
        assert_eq!(json["kind"], "error");
    }
}
