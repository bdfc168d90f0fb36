pub mod chunker;
pub mod generate;
pub mod recommend;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        };
        f.write_str(name)
    }
}

/// A topic section of book text with its keywords and difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChunk {
    pub topic: String,
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub difficulty: Level,
    #[serde(default)]
    pub chunk_index: usize,
}

/// Holds the chunks of the most recently processed book text.
#[derive(Debug, Default)]
pub struct ContentProcessor {
    chunks: Vec<ContentChunk>,
}

impl ContentProcessor {
    /// Chunk the book file at `path`. A missing file yields no chunks.
    pub fn load(path: &Path) -> Result<Self> {
        let mut processor = Self::default();
        if !path.exists() {
            info!(path = %path.display(), "no book content found, starting empty");
            return Ok(processor);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read book content {}", path.display()))?;
        processor.process_book(&text);
        Ok(processor)
    }

    pub fn from_chunks(chunks: Vec<ContentChunk>) -> Self {
        Self { chunks }
    }

    pub fn chunks(&self) -> &[ContentChunk] {
        &self.chunks
    }

    /// Replace the current chunks with those cut from `text`.
    pub fn process_book(&mut self, text: &str) -> usize {
        self.chunks = chunker::chunk_book(text);
        info!(
            chunks = self.chunks.len(),
            chars = text.len(),
            "book content processed"
        );
        self.chunks.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) fn sample_chunks() -> Vec<ContentChunk> {
        let text = "Chapter 1: Arrays\n\
            An array stores elements in contiguous memory. Access by index takes constant time. \
            Inserting in the middle requires shifting the following elements over by one.\n\
            Chapter 2: Binary Search\n\
            Binary search halves a sorted range on every comparison. The algorithm runs in \
            logarithmic time and needs random access to the underlying array.\n";
        chunker::chunk_book(text)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let processor = ContentProcessor::load(&dir.path().join("nope.txt")).unwrap();
        assert!(processor.chunks().is_empty());
    }

    #[test]
    fn test_load_chunks_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let text = "Chapter 1: Arrays\nAn array stores elements in contiguous memory so that any \
            element can be reached by index in constant time.";
        file.write_all(text.as_bytes()).unwrap();

        let processor = ContentProcessor::load(file.path()).unwrap();
        assert_eq!(processor.chunks().len(), 1);
        assert_eq!(processor.chunks()[0].topic, "Arrays");
        assert!(processor.chunks()[0].keywords.contains(&"array".to_string()));
    }

    #[test]
    fn test_process_book_replaces_chunks() {
        let mut processor = ContentProcessor::from_chunks(sample_chunks());
        assert_eq!(processor.chunks().len(), 2);
        assert_eq!(processor.process_book("too short"), 0);
        assert!(processor.chunks().is_empty());
    }

    #[test]
    fn test_chunk_json_shape() {
        let chunks = sample_chunks();
        let chunk = &chunks[1];
        let json = serde_json::to_value(chunk).unwrap();
        assert_eq!(json["topic"], "Binary Search");
        assert_eq!(json["chunkIndex"], 1);
        assert_eq!(json["difficulty"], "intermediate");

        let back: ContentChunk = serde_json::from_value(json).unwrap();
        assert_eq!(&back, chunk);
    }
}
