use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::autocomplete::{AutocompleteEngine, AutocompleteSuggestions};
use crate::kb::types::{MatchType, SimilarMatch};
use crate::kb::KnowledgeBase;

const SUGGESTION_COUNT: usize = 3;

/// Result of answering a free-text question, tagged by `status`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Answer {
    NoMatch { message: String, total_time: f64 },
    ExactMatch(AnswerBody),
    SemanticMatch(AnswerBody),
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerBody {
    pub question: String,
    /// Text of the correct option.
    pub answer: String,
    pub answer_index: usize,
    pub explanation: String,
    pub topic: String,
    pub difficulty: String,
    pub confidence: f64,
    pub options: Vec<String>,
    /// Runner-up matches, best first.
    pub suggestions: Vec<SimilarMatch>,
    pub total_time: f64,
}

impl Answer {
    pub fn status(&self) -> &'static str {
        match self {
            Answer::NoMatch { .. } => "no_match",
            Answer::ExactMatch(_) => "exact_match",
            Answer::SemanticMatch(_) => "semantic_match",
        }
    }

    pub fn body(&self) -> Option<&AnswerBody> {
        match self {
            Answer::NoMatch { .. } => None,
            Answer::ExactMatch(body) | Answer::SemanticMatch(body) => Some(body),
        }
    }
}

/// Question answering over the knowledge base, plus autocomplete.
pub struct QaEngine {
    kb: KnowledgeBase,
    autocomplete: AutocompleteEngine,
    top_k: usize,
    query_count: AtomicU64,
}

impl QaEngine {
    pub fn new(kb: KnowledgeBase, top_k: usize) -> Self {
        let autocomplete = AutocompleteEngine::new(kb.records());
        Self {
            kb,
            autocomplete,
            top_k,
            query_count: AtomicU64::new(0),
        }
    }

    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn autocomplete(&self, partial: &str) -> AutocompleteSuggestions {
        self.autocomplete.suggest(partial)
    }

    pub fn autocomplete_vocabulary(&self) -> usize {
        self.autocomplete.vocabulary_len()
    }

    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::Relaxed)
    }

    pub fn answer(&self, query: &str) -> Answer {
        let query_count = self.query_count.fetch_add(1, Ordering::Relaxed) + 1;
        let start = Instant::now();

        let mut matches = self.kb.find_similar(query, self.top_k).into_iter();
        debug!(query_count, query, "answering question");

        let Some(best) = matches.next() else {
            return Answer::NoMatch {
                message: "No matching questions found".to_string(),
                total_time: start.elapsed().as_secs_f64(),
            };
        };

        let exact = best.match_type == MatchType::Exact;
        let record = best.record;
        let body = AnswerBody {
            question: record.question,
            answer: record.correct_option,
            answer_index: record.correct_answer,
            explanation: record.explanation,
            topic: record.topic,
            difficulty: record.difficulty,
            confidence: best.score,
            options: record.options,
            suggestions: matches.take(SUGGESTION_COUNT).collect(),
            total_time: start.elapsed().as_secs_f64(),
        };

        if exact {
            Answer::ExactMatch(body)
        } else {
            Answer::SemanticMatch(body)
        }
    }
}
