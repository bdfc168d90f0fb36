pub mod stopwords;
pub mod tfidf;
pub mod types;

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::KbError;
use crate::state::SearchConfig;

use tfidf::VectorIndex;
use types::{
    MatchType, QuestionRecord, QuestionSummary, RawQuestion, SimilarMatch, DEFAULT_DIFFICULTY,
    DEFAULT_EXPLANATION, DEFAULT_TOPIC,
};

/// The loaded question bank and its TF-IDF index. Immutable once built, so
/// it can be shared freely across readers.
pub struct KnowledgeBase {
    records: Vec<QuestionRecord>,
    index: VectorIndex,
    similarity_threshold: f64,
}

impl KnowledgeBase {
    /// Read the JSON question array at `path` and index it.
    pub fn load(path: &Path, search: &SearchConfig) -> Result<Self, KbError> {
        info!(path = %path.display(), "loading knowledge base");
        let raw = std::fs::read_to_string(path).map_err(|source| KbError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let items: Vec<RawQuestion> =
            serde_json::from_str(&raw).map_err(|source| KbError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| Self::validate(i, item))
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = records.len(), "questions loaded");

        Ok(Self::from_records(records, search))
    }

    fn validate(index: usize, item: RawQuestion) -> Result<QuestionRecord, KbError> {
        let correct_option = item
            .options
            .get(item.correct_answer)
            .cloned()
            .ok_or_else(|| KbError::InvalidRecord {
                index,
                reason: format!(
                    "correct_answer {} is out of range for {} options",
                    item.correct_answer,
                    item.options.len()
                ),
            })?;
        if item.options.len() != 4 {
            warn!(index, options = item.options.len(), "question does not have 4 options");
        }

        Ok(QuestionRecord {
            question: item.question.trim().to_string(),
            options: item.options,
            correct_answer: item.correct_answer,
            correct_option,
            explanation: item
                .explanation
                .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
            topic: item.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            difficulty: item
                .difficulty
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
            keywords: item.keywords.unwrap_or_default(),
        })
    }

    /// Index already-validated records. An empty list yields an index that
    /// never produces a match.
    pub fn from_records(records: Vec<QuestionRecord>, search: &SearchConfig) -> Self {
        if records.is_empty() {
            warn!("knowledge base is empty; every query will return no match");
        }
        let texts: Vec<String> = records.iter().map(QuestionRecord::search_text).collect();
        let index = VectorIndex::build(search.vectorizer_params(), &texts);

        let kb = Self {
            records,
            index,
            similarity_threshold: search.similarity_threshold,
        };
        info!(
            vocabulary = kb.vocabulary_len(),
            topics = %kb.topics().join(", "),
            "search index ready"
        );
        kb
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.index.vocabulary_len()
    }

    /// Distinct topics in first-seen order.
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = Vec::new();
        for record in &self.records {
            if !topics.contains(&record.topic) {
                topics.push(record.topic.clone());
            }
        }
        topics
    }

    /// Rank bank questions against `query`.
    ///
    /// A query equal to a stored question (ignoring case and surrounding
    /// whitespace) returns only that question with score 1.0. Otherwise every
    /// question scoring above the similarity threshold is returned, best
    /// first, ties in bank order, at most `top_k` of them.
    pub fn find_similar(&self, query: &str, top_k: usize) -> Vec<SimilarMatch> {
        if query.trim().is_empty() {
            return vec![];
        }

        let normalized = query.trim().to_lowercase();
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.question.trim().to_lowercase() == normalized)
        {
            debug!(question = %record.question, "exact match");
            return vec![SimilarMatch {
                record: record.clone(),
                match_type: MatchType::Exact,
                score: 1.0,
            }];
        }

        let mut matches: Vec<SimilarMatch> = self
            .index
            .similarities(&query.to_lowercase())
            .into_iter()
            .zip(&self.records)
            .filter(|(score, _)| *score > self.similarity_threshold)
            .map(|(score, record)| SimilarMatch {
                record: record.clone(),
                match_type: MatchType::Semantic,
                score,
            })
            .collect();

        // sort_by is stable, so equal scores keep bank order
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        debug!(count = matches.len(), "semantic matches");
        matches
    }

    /// Bank listing, optionally narrowed to topics containing `topic`.
    pub fn list_questions(&self, topic: Option<&str>, limit: Option<usize>) -> Vec<QuestionSummary> {
        let topic = topic.map(str::to_lowercase);
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| match &topic {
                Some(t) => r.topic.to_lowercase().contains(t.as_str()),
                None => true,
            })
            .take(limit.unwrap_or(usize::MAX))
            .map(|(i, r)| summarize(i, r))
            .collect()
    }

    /// Up to `count` distinct questions drawn at random.
    pub fn practice_set<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<QuestionSummary> {
        let positions: Vec<usize> = (0..self.records.len()).collect();
        positions
            .choose_multiple(rng, count)
            .map(|&i| summarize(i, &self.records[i]))
            .collect()
    }
}

fn summarize(position: usize, record: &QuestionRecord) -> QuestionSummary {
    QuestionSummary {
        id: position + 1,
        question: record.question.clone(),
        topic: record.topic.clone(),
        difficulty: record.difficulty.clone(),
        options: record.options.clone(),
    }
}
