use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::info;

use crate::kb::types::QuestionRecord;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word pattern"));

/// Filler words dropped from the frequency table.
const COMMON_WORDS: &[&str] = &[
    "what", "is", "the", "a", "an", "in", "for", "of", "to", "and", "or",
];

/// Follow-up words offered after a completed word.
const CONTEXT_MAP: &[(&str, &[&str])] = &[
    ("time", &["complexity", "space", "worst", "best", "average"]),
    ("space", &["complexity", "worst", "best", "average"]),
    ("hash", &["table", "function", "collision", "map"]),
    ("array", &["list", "size", "index", "element", "resizing"]),
    ("worst", &["case", "time", "complexity"]),
    ("best", &["case", "time", "complexity"]),
    ("binary", &["search", "tree", "heap"]),
    ("linked", &["list", "node"]),
    ("merge", &["sort", "algorithm"]),
    ("quick", &["sort", "algorithm"]),
];

const COMPLETION_POOL: usize = 200;
const FALLBACK_POOL: usize = 50;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AutocompleteSuggestions {
    pub word_predictions: Vec<String>,
    pub question_suggestions: Vec<String>,
}

/// Word-frequency based suggestions over the question bank.
pub struct AutocompleteEngine {
    questions: Vec<String>,
    /// Words by count descending; ties keep first-seen order.
    ranked: Vec<(String, u64)>,
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text).map(|m| m.as_str().to_lowercase())
}

impl AutocompleteEngine {
    pub fn new(records: &[QuestionRecord]) -> Self {
        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();
        let mut bump = |word: String| {
            let count = counts.entry(word.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(word);
            }
            *count += 1;
        };

        for record in records {
            words(&record.question).for_each(&mut bump);
            for keyword in &record.keywords {
                words(keyword).for_each(&mut bump);
            }
        }
        for word in COMMON_WORDS {
            counts.remove(*word);
        }

        let mut ranked: Vec<(String, u64)> = first_seen
            .into_iter()
            .filter_map(|w| counts.get(&w).map(|&c| (w, c)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        info!(unique_words = ranked.len(), "autocomplete index built");

        Self {
            questions: records.iter().map(|r| r.question.clone()).collect(),
            ranked,
        }
    }

    /// Complete the word being typed, or suggest the next word when the input
    /// ends with whitespace.
    pub fn predict_next_words(&self, partial: &str, top_k: usize) -> Vec<String> {
        if partial.chars().count() < 2 {
            return vec![];
        }

        let lowered = partial.to_lowercase();
        let last_word = lowered.split_whitespace().last().unwrap_or("");
        if partial.ends_with(' ') {
            self.next_word_suggestions(last_word, top_k)
        } else {
            self.word_completions(last_word, top_k)
        }
    }

    fn word_completions(&self, partial_word: &str, top_k: usize) -> Vec<String> {
        if partial_word.chars().count() < 2 {
            return vec![];
        }
        // The pool is already ordered by frequency.
        self.ranked
            .iter()
            .take(COMPLETION_POOL)
            .filter(|(word, _)| word.starts_with(partial_word) && word != partial_word)
            .take(top_k)
            .map(|(word, _)| word.clone())
            .collect()
    }

    fn next_word_suggestions(&self, previous_word: &str, top_k: usize) -> Vec<String> {
        if let Some((_, follow)) = CONTEXT_MAP.iter().find(|(word, _)| *word == previous_word) {
            return follow.iter().take(top_k).map(|w| w.to_string()).collect();
        }
        self.ranked
            .iter()
            .take(FALLBACK_POOL)
            .filter(|(word, _)| word.chars().count() > 3)
            .take(top_k)
            .map(|(word, _)| word.clone())
            .collect()
    }

    /// Bank questions containing `partial`, case-insensitively, in bank order.
    pub fn get_question_suggestions(&self, partial: &str, top_k: usize) -> Vec<String> {
        if partial.chars().count() < 3 {
            return vec![];
        }
        let needle = partial.to_lowercase();
        self.questions
            .iter()
            .filter(|q| q.to_lowercase().contains(&needle))
            .take(top_k)
            .cloned()
            .collect()
    }

    pub fn suggest(&self, partial: &str) -> AutocompleteSuggestions {
        AutocompleteSuggestions {
            word_predictions: self.predict_next_words(partial, 5),
            question_suggestions: self.get_question_suggestions(partial, 3),
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.ranked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kb::tests::sample_kb;

    fn engine() -> AutocompleteEngine {
        AutocompleteEngine::new(sample_kb().records())
    }

    #[test]
    fn test_short_input_guards() {
        let engine = engine();
        assert!(engine.predict_next_words("a", 5).is_empty());
        assert!(engine.predict_next_words("", 5).is_empty());
        assert!(engine.get_question_suggestions("ab", 3).is_empty());
    }

    #[test]
    fn test_context_map_after_space() {
        let engine = engine();
        assert_eq!(
            engine.predict_next_words("time ", 5),
            vec!["complexity", "space", "worst", "best", "average"]
        );
        assert_eq!(engine.predict_next_words("Linked ", 5), vec!["list", "node"]);
        assert_eq!(engine.predict_next_words("what is the time ", 2), vec!["complexity", "space"]);
    }

    #[test]
    fn test_fallback_uses_frequent_long_words() {
        let engine = engine();
        let suggestions = engine.predict_next_words("explain ", 5);
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= 5);
        assert!(suggestions.iter().all(|w| w.chars().count() > 3));
        // "complexity" appears in three questions and one keyword
        assert_eq!(suggestions[0], "complexity");
    }

    #[test]
    fn test_word_completion_by_frequency() {
        let engine = engine();
        let completions = engine.predict_next_words("what is the comp", 5);
        assert_eq!(completions, vec!["complexity"]);
        let sorts = engine.predict_next_words("so", 5);
        assert_eq!(sorts[0], "sort");
    }

    #[test]
    fn test_only_a_trailing_space_predicts_the_next_word() {
        let engine = engine();
        assert_eq!(engine.predict_next_words("what is the comp\t", 5), vec!["complexity"]);
        assert_eq!(engine.predict_next_words("what is the comp\n", 5), vec!["complexity"]);
        assert_ne!(engine.predict_next_words("time\t", 5), engine.predict_next_words("time ", 5));
    }

    #[test]
    fn test_completion_excludes_exact_word() {
        let engine = engine();
        assert!(!engine
            .predict_next_words("sort", 5)
            .contains(&"sort".to_string()));
    }

    #[test]
    fn test_common_words_removed() {
        let engine = engine();
        assert!(engine.ranked.iter().all(|(w, _)| !COMMON_WORDS.contains(&w.as_str())));
        assert!(engine.vocabulary_len() > 0);
    }

    #[test]
    fn test_question_suggestions_substring_in_bank_order() {
        let engine = engine();
        let found = engine.get_question_suggestions("COMPLEXITY", 3);
        assert_eq!(
            found,
            vec![
                "What is the time complexity of array access?",
                "What is the worst case time complexity of quick sort?",
                "What is the space complexity of merge sort?",
            ]
        );
        assert_eq!(engine.get_question_suggestions("complexity", 1).len(), 1);
    }
}
