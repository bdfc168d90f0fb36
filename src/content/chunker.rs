use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ContentChunk, Level};

/// Chapter/section headers. The title is the rest of the header line.
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\A|\n)\s*(Chapter|Section)\s*\d+[:.]?\s*([^\n]+)").expect("valid header pattern")
});

static LONG_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z]{4,}\b").expect("valid word pattern"));

const INTRODUCTION: &str = "Introduction";

/// Sections at or below this many characters are not worth a chunk.
const MIN_CHUNK_CHARS: usize = 100;

const MAX_KEYWORDS: usize = 10;
const FREQUENT_WORDS: usize = 5;

const DSA_TERMS: &[&str] = &[
    "array",
    "linked list",
    "stack",
    "queue",
    "tree",
    "graph",
    "hash table",
    "algorithm",
    "complexity",
    "sorting",
    "searching",
    "recursion",
    "dynamic programming",
    "binary search",
    "dfs",
    "bfs",
    "heap",
    "priority queue",
];

const STOP_WORDS: &[&str] = &["that", "this", "with", "from", "they", "have", "will", "been"];

const ADVANCED: &[&str] = &["optimization", "advanced", "complex", "theorem", "proof"];
const INTERMEDIATE: &[&str] = &["algorithm", "complexity", "analysis", "implementation"];
const BEGINNER: &[&str] = &["basic", "introduction", "simple", "fundamental"];

/// Split book text at chapter/section headers into `(topic, body)` pairs.
/// Text with no headers is one "Introduction" section; otherwise anything
/// before the first header is dropped.
pub fn split_sections(text: &str) -> Vec<(String, &str)> {
    let headers: Vec<_> = HEADER.captures_iter(text).collect();
    if headers.is_empty() {
        return vec![(INTRODUCTION.to_string(), text)];
    }

    let mut sections = Vec::new();

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        sections.push((title.as_str().trim().to_string(), &text[whole.end()..end]));
    }

    sections
}

/// Turn raw book text into keyword-tagged chunks, dropping short sections.
pub fn chunk_book(text: &str) -> Vec<ContentChunk> {
    split_sections(text)
        .into_iter()
        .map(|(topic, body)| (topic, body.trim()))
        .filter(|(_, body)| body.chars().count() > MIN_CHUNK_CHARS)
        .enumerate()
        .map(|(chunk_index, (topic, body))| ContentChunk {
            topic,
            content: body.to_string(),
            keywords: extract_keywords(body),
            difficulty: classify_difficulty(body),
            chunk_index,
        })
        .collect()
}

/// Known DSA terms present in the text, then its most frequent longer words.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut keywords: Vec<String> = DSA_TERMS
        .iter()
        .filter(|term| lowered.contains(*term))
        .map(|term| term.to_string())
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for m in LONG_WORD.find_iter(text) {
        let word = m.as_str().to_lowercase();
        if STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }
    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    let frequent: Vec<String> = order
        .into_iter()
        .filter(|word| !keywords.contains(word))
        .take(FREQUENT_WORDS)
        .collect();
    keywords.extend(frequent);
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

pub fn classify_difficulty(text: &str) -> Level {
    let lowered = text.to_lowercase();
    let score = |indicators: &[&str]| indicators.iter().filter(|w| lowered.contains(*w)).count();

    if score(ADVANCED) > 0 {
        Level::Advanced
    } else if score(INTERMEDIATE) > score(BEGINNER) {
        Level::Intermediate
    } else {
        Level::Beginner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILLER: &str = "Elements are stored next to each other in memory so that reading any \
        position takes the same amount of time regardless of size.";

    #[test]
    fn test_split_sections_with_preamble() {
        let text = format!("Preface text.\nChapter 1: Arrays\n{FILLER}\nSection 2. Stacks\nLIFO.");
        let sections = split_sections(&text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, "Arrays");
        assert!(sections[0].1.contains("Elements are stored"));
        assert!(!sections[0].1.contains("Preface"));
        assert_eq!(sections[1].0, "Stacks");
        assert_eq!(sections[1].1.trim(), "LIFO.");
    }

    #[test]
    fn test_header_at_start_of_text() {
        let text = format!("Chapter 1 Linked Lists\n{FILLER}");
        let sections = split_sections(&text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "Linked Lists");
    }

    #[test]
    fn test_long_preamble_is_not_a_chunk() {
        let text = format!("{FILLER}\nChapter 1: Arrays\n{FILLER}");
        let chunks = chunk_book(&text);
        let topics: Vec<&str> = chunks.iter().map(|c| c.topic.as_str()).collect();
        assert_eq!(topics, vec!["Arrays"]);
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn test_no_headers_is_one_introduction() {
        let sections = split_sections(FILLER);
        assert_eq!(sections, vec![("Introduction".to_string(), FILLER)]);
    }

    #[test]
    fn test_chunk_book_drops_short_sections() {
        let text = format!("short intro\nChapter 1: Arrays\n{FILLER}\nChapter 2: Stacks\ntoo short\nChapter 3: Queues\n{FILLER}");
        let chunks = chunk_book(&text);
        let topics: Vec<&str> = chunks.iter().map(|c| c.topic.as_str()).collect();
        assert_eq!(topics, vec!["Arrays", "Queues"]);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[1].chunk_index, 1);
        assert_eq!(chunks[0].content, FILLER);
    }

    #[test]
    fn test_chunk_book_empty_text() {
        assert!(chunk_book("").is_empty());
    }

    #[test]
    fn test_keywords_terms_then_frequent_words() {
        let text = "A binary search tree is a tree. Searching the tree is fast; \
            searching nodes, nodes, nodes.";
        let keywords = extract_keywords(text);
        // "binary search" matches inside "binary search tree"
        assert_eq!(&keywords[..3], &["tree", "searching", "binary search"]);
        assert_eq!(keywords[3], "nodes");
        assert_eq!(keywords.iter().filter(|k| *k == "tree").count(), 1);
        assert!(keywords.len() <= 10);
    }

    #[test]
    fn test_keywords_skip_stop_words_and_short_words() {
        let keywords = extract_keywords("this that with from they have will been cat dog");
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_keywords_capped() {
        let text = "array linked list stack queue tree graph hash table algorithm complexity \
            sorting searching recursion";
        assert_eq!(extract_keywords(text).len(), 10);
    }

    #[test]
    fn test_classify_difficulty() {
        assert_eq!(classify_difficulty("A proof of the theorem"), Level::Advanced);
        assert_eq!(
            classify_difficulty("Algorithm analysis and its implementation"),
            Level::Intermediate
        );
        assert_eq!(
            classify_difficulty("A basic introduction to the algorithm"),
            Level::Beginner
        );
        assert_eq!(classify_difficulty("nothing notable"), Level::Beginner);
    }
}
