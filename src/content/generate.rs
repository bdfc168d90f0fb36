use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ContentChunk;

/// Chunks used when nothing matches the requested topic.
const FALLBACK_CHUNKS: usize = 3;
const MIN_SENTENCE_CHARS: usize = 20;
const MAX_OPTION_CHARS: usize = 100;

const DISTRACTORS: &[&str] = &[
    "It has exponential time complexity",
    "It requires additional memory allocation",
    "It works only with numeric data",
    "It uses recursive approach exclusively",
];

const HINTS: &[&str] = &[
    "Think about the most efficient approach",
    "Consider using appropriate data structures",
    "Analyze the time and space complexity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McqCategory {
    Conceptual,
    Algorithm,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
    pub category: McqCategory,
    pub difficulty: String,
}

struct McqTemplate {
    key: &'static str,
    question: &'static str,
    options: [&'static str; 4],
    correct_answer: usize,
    explanation: &'static str,
}

const MCQ_TEMPLATES: &[McqTemplate] = &[
    McqTemplate {
        key: "arrays",
        question: "What is the time complexity of accessing an element in an array by index?",
        options: ["O(1)", "O(log n)", "O(n)", "O(n²)"],
        correct_answer: 0,
        explanation: "Array elements can be accessed directly using their index.",
    },
    McqTemplate {
        key: "binary search",
        question: "What is a prerequisite for binary search algorithm?",
        options: [
            "Array must be sorted",
            "Array must be unsorted",
            "Array must have duplicates",
            "Array must be empty",
        ],
        correct_answer: 0,
        explanation: "Binary search requires the array to be sorted to work correctly.",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub input: String,
    pub output: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStub {
    pub title: String,
    pub difficulty: String,
    pub description: String,
    pub input_format: String,
    pub output_format: String,
    pub constraints: Vec<String>,
    pub tags: Vec<String>,
    pub test_cases: Vec<TestCase>,
    pub hints: Vec<String>,
}

struct ProblemTemplate {
    key: &'static str,
    title: &'static str,
    description: &'static str,
    input_format: &'static str,
    output_format: &'static str,
    constraints: &'static [&'static str],
    tags: &'static [&'static str],
}

/// The first entry is the default.
const PROBLEM_TEMPLATES: &[ProblemTemplate] = &[
    ProblemTemplate {
        key: "arrays",
        title: "Two Sum",
        description: "Given an array of integers nums and an integer target, return indices of the two numbers such that they add up to target.",
        input_format: "nums = [2,7,11,15], target = 9",
        output_format: "[0,1]",
        constraints: &["2 ≤ nums.length ≤ 10⁴", "-10⁹ ≤ nums[i] ≤ 10⁹"],
        tags: &["Array", "Hash Table"],
    },
    ProblemTemplate {
        key: "binary search",
        title: "Binary Search",
        description: "Given a sorted array of integers nums and an integer target, return the index of target if it exists, otherwise return -1.",
        input_format: "nums = [-1,0,3,5,9,12], target = 9",
        output_format: "4",
        constraints: &["1 ≤ nums.length ≤ 10⁴", "-10⁴ < nums[i], target < 10⁴"],
        tags: &["Array", "Binary Search"],
    },
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Chunks whose topic contains `topic`, or whose keywords include one of its
/// words. Falls back to the first few chunks when none match.
pub fn relevant_chunks<'a>(chunks: &'a [ContentChunk], topic: &str) -> Vec<&'a ContentChunk> {
    let topic = topic.to_lowercase();
    let relevant: Vec<&ContentChunk> = chunks
        .iter()
        .filter(|chunk| {
            chunk.topic.to_lowercase().contains(&topic)
                || topic
                    .split_whitespace()
                    .any(|word| chunk.keywords.iter().any(|k| k == word))
        })
        .collect();

    if relevant.is_empty() {
        chunks.iter().take(FALLBACK_CHUNKS).collect()
    } else {
        relevant
    }
}

/// Build up to `count` questions from matching chunks, then pad with
/// template questions so exactly `count` are returned.
pub fn generate_mcq<R: Rng + ?Sized>(
    chunks: &[ContentChunk],
    topic: &str,
    difficulty: &str,
    count: usize,
    rng: &mut R,
) -> Vec<McqQuestion> {
    let mut questions: Vec<McqQuestion> = relevant_chunks(chunks, topic)
        .into_iter()
        .take(count)
        .filter_map(|chunk| create_mcq_from_chunk(chunk, difficulty, rng))
        .collect();
    let from_content = questions.len();

    while questions.len() < count {
        questions.push(template_question(topic, difficulty));
    }
    debug!(topic, count, from_content, "generated mcq questions");
    questions
}

/// A question whose correct option is a sentence from the chunk. `None` when
/// the chunk has no sentence long enough to use.
pub fn create_mcq_from_chunk<R: Rng + ?Sized>(
    chunk: &ContentChunk,
    difficulty: &str,
    rng: &mut R,
) -> Option<McqQuestion> {
    let sentences: Vec<&str> = chunk
        .content
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect();
    let sentence = *sentences.choose(rng)?;

    let topic = &chunk.topic;
    let prompts = [
        format!("What is a key characteristic of {topic}?"),
        format!("According to the content, what can be said about {topic}?"),
        format!("Which statement about {topic} is correct?"),
    ];
    let question = prompts.choose(rng)?.clone();

    let correct = if sentence.chars().count() > MAX_OPTION_CHARS {
        let head: String = sentence.chars().take(MAX_OPTION_CHARS).collect();
        format!("{head}...")
    } else {
        sentence.to_string()
    };

    let mut options = vec![correct.clone()];
    options.extend(DISTRACTORS.choose_multiple(rng, 3).map(|d| d.to_string()));
    options.shuffle(rng);
    let correct_answer = options.iter().position(|o| *o == correct).unwrap_or(0);

    Some(McqQuestion {
        question,
        options,
        correct_answer,
        explanation: format!("The content states: {sentence}"),
        category: McqCategory::Conceptual,
        difficulty: difficulty.to_string(),
    })
}

/// Fixed question for well-known topics, or a generic one.
pub fn template_question(topic: &str, difficulty: &str) -> McqQuestion {
    let lowered = topic.to_lowercase();
    match MCQ_TEMPLATES.iter().find(|t| lowered.contains(t.key)) {
        Some(template) => McqQuestion {
            question: template.question.to_string(),
            options: to_strings(&template.options),
            correct_answer: template.correct_answer,
            explanation: template.explanation.to_string(),
            category: McqCategory::Algorithm,
            difficulty: difficulty.to_string(),
        },
        None => McqQuestion {
            question: format!("What is an important concept related to {topic}?"),
            options: to_strings(&[
                "Data organization",
                "Memory allocation",
                "Algorithm efficiency",
                "All of the above",
            ]),
            correct_answer: 3,
            explanation: format!("All mentioned concepts are important when studying {topic}."),
            category: McqCategory::General,
            difficulty: difficulty.to_string(),
        },
    }
}

pub fn generate_problems(topic: &str, difficulty: &str, count: usize) -> Vec<ProblemStub> {
    let lowered = topic.to_lowercase();
    let template = PROBLEM_TEMPLATES
        .iter()
        .find(|t| lowered.contains(t.key))
        .unwrap_or(&PROBLEM_TEMPLATES[0]);
    debug!(topic, template = template.key, count, "generating problems");

    let stub = ProblemStub {
        title: template.title.to_string(),
        difficulty: difficulty.to_string(),
        description: template.description.to_string(),
        input_format: template.input_format.to_string(),
        output_format: template.output_format.to_string(),
        constraints: to_strings(template.constraints),
        tags: to_strings(template.tags),
        test_cases: vec![TestCase {
            input: template.input_format.to_string(),
            output: template.output_format.to_string(),
            explanation: "Example test case".to_string(),
        }],
        hints: to_strings(HINTS),
    };
    vec![stub; count]
}
