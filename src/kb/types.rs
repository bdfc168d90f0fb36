use serde::{Deserialize, Serialize};

pub const DEFAULT_EXPLANATION: &str = "No explanation provided.";
pub const DEFAULT_TOPIC: &str = "General";
pub const DEFAULT_DIFFICULTY: &str = "Medium";

/// One entry of the question bank file, as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

/// A loaded, validated question. Read-only after the bank is built.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    /// Text of `options[correct_answer]`.
    pub correct_option: String,
    pub explanation: String,
    pub topic: String,
    pub difficulty: String,
    pub keywords: Vec<String>,
}

impl QuestionRecord {
    /// Text fed to the vectorizer: question, keywords and topic, lowercased.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.question,
            self.keywords.join(" "),
            self.topic
        )
        .to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Semantic,
}

/// A question returned by similarity search.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarMatch {
    #[serde(flatten)]
    pub record: QuestionRecord,
    pub match_type: MatchType,
    pub score: f64,
}

/// Compact listing entry used by `questions` and `practice`.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    /// 1-based position in the bank.
    pub id: usize,
    pub question: String,
    pub topic: String,
    pub difficulty: String,
    pub options: Vec<String>,
}
