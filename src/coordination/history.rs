use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Entries considered when building context for a knowledge base query.
const CONTEXT_WINDOW: usize = 5;

/// Entries kept before the oldest is dropped.
pub const HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryKind {
    /// A web search whose results were stored.
    SearchAndStore { query: String },
    ResearchPipeline { topic: String },
    KnowledgeQuery { question: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub kind: HistoryKind,
    pub timestamp: DateTime<Utc>,
}

/// Workflow history kept by one [`Coordinator`](super::Coordinator).
///
/// Holds at most `capacity` entries, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationHistory {
    entries: VecDeque<HistoryEntry>,
    #[serde(skip)]
    capacity: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history that keeps the last `capacity` entries, at least one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(HISTORY_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, kind: HistoryKind) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            kind,
            timestamp: Utc::now(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Earlier questions and research topics among the last five entries,
    /// space separated. Empty when none qualify.
    pub fn context(&self) -> String {
        let start = self.entries.len().saturating_sub(CONTEXT_WINDOW);
        self.entries
            .range(start..)
            .filter_map(|entry| match &entry.kind {
                HistoryKind::KnowledgeQuery { question } => {
                    Some(format!("Previous question: {question}"))
                }
                HistoryKind::ResearchPipeline { topic } => Some(format!("Research topic: {topic}")),
                HistoryKind::SearchAndStore { .. } => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_uses_last_five_entries() {
        let mut history = ConversationHistory::new();
        history.push(HistoryKind::KnowledgeQuery {
            question: "too old".into(),
        });
        history.push(HistoryKind::ResearchPipeline {
            topic: "rust async".into(),
        });
        history.push(HistoryKind::SearchAndStore {
            query: "ignored".into(),
        });
        for q in ["a", "b", "c"] {
            history.push(HistoryKind::KnowledgeQuery {
                question: q.into(),
            });
        }

        assert_eq!(
            history.context(),
            "Research topic: rust async Previous question: a Previous question: b Previous question: c"
        );
    }

    #[test]
    fn empty_history_has_no_context() {
        let mut history = ConversationHistory::new();
        assert_eq!(history.context(), "");
        history.push(HistoryKind::SearchAndStore { query: "q".into() });
        assert_eq!(history.context(), "");
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn entries_serialize_with_type_tag() {
        let mut history = ConversationHistory::new();
        history.push(HistoryKind::ResearchPipeline { topic: "t".into() });
        let value = serde_json::to_value(history.entries().next().unwrap()).unwrap();
        assert_eq!(value["type"], "research_pipeline");
        assert_eq!(value["topic"], "t");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn oldest_entries_are_dropped_at_capacity() {
        let mut history = ConversationHistory::with_capacity(3);
        for q in ["first", "second", "third", "fourth"] {
            history.push(HistoryKind::KnowledgeQuery {
                question: q.into(),
            });
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.capacity(), 3);
        let questions: Vec<&str> = history
            .entries()
            .filter_map(|e| match &e.kind {
                HistoryKind::KnowledgeQuery { question } => Some(question.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(questions, ["second", "third", "fourth"]);
        assert!(!history.context().contains("first"));
    }

    #[test]
    fn default_history_is_bounded() {
        let mut history = ConversationHistory::new();
        for i in 0..HISTORY_CAPACITY + 10 {
            history.push(HistoryKind::SearchAndStore {
                query: format!("q{i}"),
            });
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert!(matches!(
            &history.entries().next().unwrap().kind,
            HistoryKind::SearchAndStore { query } if query == "q10"
        ));
    }
}
