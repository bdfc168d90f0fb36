use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ContentChunk, Level};

const MAX_TOPICS: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Performance {
    #[serde(default)]
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub recommended_topics: Vec<String>,
    pub suggested_difficulty: Level,
    pub weak_areas: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Suggest a difficulty from the learner's accuracy and up to five topics
/// from the available content.
pub fn recommend(user_id: &str, performance: &Performance, chunks: &[ContentChunk]) -> Recommendations {
    let (level, step) = if performance.accuracy < 0.5 {
        (Level::Beginner, "Focus on fundamental concepts")
    } else if performance.accuracy < 0.8 {
        (Level::Intermediate, "Practice more complex problems")
    } else {
        (Level::Advanced, "Challenge yourself with advanced topics")
    };

    let mut topics: Vec<String> = Vec::new();
    for chunk in chunks {
        if topics.len() == MAX_TOPICS {
            break;
        }
        if !topics.contains(&chunk.topic) {
            topics.push(chunk.topic.clone());
        }
    }

    debug!(user_id, accuracy = performance.accuracy, level = %level, "recommendations computed");
    Recommendations {
        recommended_topics: topics,
        suggested_difficulty: level,
        weak_areas: Vec::new(),
        next_steps: vec![step.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(topic: &str) -> ContentChunk {
        ContentChunk {
            topic: topic.to_string(),
            content: String::new(),
            keywords: vec![],
            difficulty: Level::Beginner,
            chunk_index: 0,
        }
    }

    #[test]
    fn test_accuracy_thresholds() {
        let level = |accuracy| recommend("u1", &Performance { accuracy }, &[]).suggested_difficulty;
        assert_eq!(level(0.0), Level::Beginner);
        assert_eq!(level(0.49), Level::Beginner);
        assert_eq!(level(0.5), Level::Intermediate);
        assert_eq!(level(0.79), Level::Intermediate);
        assert_eq!(level(0.8), Level::Advanced);
        assert_eq!(level(1.0), Level::Advanced);
    }

    #[test]
    fn test_next_steps_and_weak_areas() {
        let recs = recommend("u1", &Performance::default(), &[]);
        assert_eq!(recs.next_steps, vec!["Focus on fundamental concepts"]);
        assert!(recs.weak_areas.is_empty());
        assert!(recs.recommended_topics.is_empty());
    }

    #[test]
    fn test_topics_distinct_and_capped() {
        let chunks: Vec<ContentChunk> = ["Arrays", "Stacks", "Arrays", "Queues", "Trees", "Graphs", "Heaps"]
            .iter()
            .map(|t| chunk(t))
            .collect();
        let recs = recommend("u1", &Performance { accuracy: 0.9 }, &chunks);
        assert_eq!(
            recs.recommended_topics,
            vec!["Arrays", "Stacks", "Queues", "Trees", "Graphs"]
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(recommend("u1", &Performance { accuracy: 0.6 }, &[])).unwrap();
        assert_eq!(json["suggestedDifficulty"], "intermediate");
        assert!(json["weakAreas"].is_array());
        assert_eq!(json["nextSteps"][0], "Practice more complex problems");
        assert!(json["recommendedTopics"].is_array());
    }

    #[test]
    fn test_performance_defaults_missing_accuracy() {
        let performance: Performance = serde_json::from_str("{}").unwrap();
        assert_eq!(performance.accuracy, 0.0);
    }
}
