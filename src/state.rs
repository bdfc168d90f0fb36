use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use crate::content::ContentProcessor;
use crate::kb::tfidf::VectorizerParams;
use crate::kb::KnowledgeBase;
use crate::qa::QaEngine;

/// Similarity search tuning. The defaults are the values the question bank
/// was calibrated against; both can be overridden from the environment.
#[derive(Debug, Clone, Serialize)]
pub struct SearchConfig {
    pub similarity_threshold: f64,
    pub max_features: usize,
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.1,
            max_features: 1000,
            top_k: 5,
        }
    }
}

impl SearchConfig {
    pub fn vectorizer_params(&self) -> VectorizerParams {
        VectorizerParams {
            max_features: self.max_features,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub question_bank: PathBuf,
    pub book_content: PathBuf,
    pub search: SearchConfig,
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let question_bank = dotenv::var("DSA_QUESTION_BANK")
            .unwrap_or_else(|_| "data/DSA_Arrays1.json".to_string());
        let book_content = dotenv::var("DSA_BOOK_CONTENT")
            .unwrap_or_else(|_| "data/book_content.txt".to_string());

        let mut search = SearchConfig::default();
        if let Ok(raw) = dotenv::var("DSA_SIMILARITY_THRESHOLD") {
            search.similarity_threshold = raw
                .trim()
                .parse()
                .with_context(|| format!("DSA_SIMILARITY_THRESHOLD is not a number: {raw}"))?;
        }
        if let Ok(raw) = dotenv::var("DSA_MAX_FEATURES") {
            search.max_features = raw
                .trim()
                .parse()
                .with_context(|| format!("DSA_MAX_FEATURES is not a count: {raw}"))?;
        }
        let seed = match dotenv::var("DSA_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("DSA_SEED is not an integer: {raw}"))?,
            ),
            _ => None,
        };

        Ok(Self {
            question_bank: PathBuf::from(question_bank),
            book_content: PathBuf::from(book_content),
            search,
            seed,
        })
    }
}

/// Everything a command needs, built once by `main` and handed to handlers.
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Load the question bank and build the search and autocomplete indexes.
    pub fn qa_engine(&self) -> Result<QaEngine> {
        let kb = KnowledgeBase::load(&self.config.question_bank, &self.config.search)
            .context("System not initialized")?;
        Ok(QaEngine::new(kb, self.config.search.top_k))
    }

    pub fn content_processor(&self) -> Result<ContentProcessor> {
        ContentProcessor::load(&self.config.book_content)
    }

    /// Seeded when a seed is configured so generated output is reproducible.
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => {
                debug!(seed, "using seeded rng");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }
}
